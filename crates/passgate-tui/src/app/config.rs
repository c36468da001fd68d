//! TUI configuration persistence
//!
//! Saves and loads front-end preferences: where the passcode hash lives, how
//! the simulated biometric sensor behaves, and the colour scheme. Passcode
//! behaviour itself lives in [`passgate_core::PasscodeConfig`].

use std::fs;
use std::path::PathBuf;

use clap::ValueEnum;
use passgate_core::{ConfigError, FilePasscodeStorage};
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "tui.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "passgate";

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Passcode file; the platform data directory when unset
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Simulated biometric sensor behaviour
    #[serde(default)]
    pub biometrics: BiometricsMode,

    /// How long a simulated challenge takes
    #[serde(default = "default_biometrics_delay_ms")]
    pub biometrics_delay_ms: u64,

    /// Use the high-contrast palette
    #[serde(default)]
    pub high_contrast: bool,
}

/// Simulated biometric sensor behaviour
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BiometricsMode {
    /// No sensor
    #[default]
    Off,
    /// Every challenge succeeds
    Approve,
    /// Every challenge fails
    Deny,
    /// Challenges succeed half of the time
    Random,
}

fn default_biometrics_delay_ms() -> u64 {
    800
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            biometrics: BiometricsMode::Off,
            biometrics_delay_ms: default_biometrics_delay_ms(),
            high_contrast: false,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config).join(CONFIG_DIR_NAME);
            return Some(path);
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from disk
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = match Self::config_file_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse TUI config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read TUI config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_dir = Self::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        fs::write(&config_file, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved TUI config to {:?}", config_file);
        Ok(())
    }

    /// Passcode file location, falling back to the default data path
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(FilePasscodeStorage::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.storage_path.is_none());
        assert_eq!(config.biometrics, BiometricsMode::Off);
        assert_eq!(config.biometrics_delay_ms, 800);
        assert!(!config.high_contrast);
        assert_eq!(config.storage_path(), FilePasscodeStorage::default_path());
    }

    #[test]
    fn test_config_serialization() {
        let config = TuiConfig {
            storage_path: Some(PathBuf::from("/tmp/passcode.json")),
            biometrics: BiometricsMode::Random,
            biometrics_delay_ms: 10,
            high_contrast: true,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"random\""));

        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.storage_path(), PathBuf::from("/tmp/passcode.json"));
        assert_eq!(parsed.biometrics, BiometricsMode::Random);
        assert_eq!(parsed.biometrics_delay_ms, 10);
        assert!(parsed.high_contrast);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let parsed: TuiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.biometrics, BiometricsMode::Off);
        assert_eq!(parsed.biometrics_delay_ms, 800);
    }
}
