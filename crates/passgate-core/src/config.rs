//! Passcode configuration persistence
//!
//! One JSON file holds the passcode length, attempt limit, lifecycle behaviour,
//! validation strength, prompt titles and hashing cost. Missing fields take
//! their defaults, so a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::biometrics::BiometricsParameters;
use crate::error::ConfigError;
use crate::flow::FlowTitles;
use crate::storage::HashParams;
use crate::validation::{EqualDigitsRule, PasscodeValidator};
use crate::view_model::PasscodeSettings;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "passgate";

/// Passcode behaviour shared by the view-model and every coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasscodeConfig {
    /// Number of digits in a passcode
    #[serde(default = "default_passcode_length")]
    pub passcode_length: usize,

    /// Wrong codes allowed before lockout (enter and change flows)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Reset the flow when the app goes to the background
    #[serde(default)]
    pub reset_when_enter_background: bool,

    /// Ask for biometrics when the app returns to the foreground
    #[serde(default = "default_true")]
    pub request_biometrics_when_enter_foreground: bool,

    /// Reject codes with a run of this many equal digits; `None` disables
    #[serde(default = "default_min_equal_digits")]
    pub min_equal_digits: Option<usize>,

    #[serde(default)]
    pub titles: FlowTitles,

    /// Biometric prompt text
    #[serde(default)]
    pub biometrics: BiometricsParameters,

    /// Argon2id cost for stored passcodes
    #[serde(default)]
    pub hash: HashParams,
}

fn default_passcode_length() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_min_equal_digits() -> Option<usize> {
    Some(4)
}

impl Default for PasscodeConfig {
    fn default() -> Self {
        Self {
            passcode_length: default_passcode_length(),
            max_attempts: default_max_attempts(),
            reset_when_enter_background: false,
            request_biometrics_when_enter_foreground: true,
            min_equal_digits: default_min_equal_digits(),
            titles: FlowTitles::default(),
            biometrics: BiometricsParameters::default(),
            hash: HashParams::default(),
        }
    }
}

impl PasscodeConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns the default configuration if the file doesn't exist, can't be
    /// parsed or holds invalid values.
    pub fn load() -> Self {
        let path = match Self::config_file_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Load and validate configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_file = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&config_file)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values that would make every flow unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.passcode_length == 0 {
            return Err(ConfigError::Invalid(
                "passcode_length must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if let Some(n) = self.min_equal_digits {
            if n < 2 {
                return Err(ConfigError::Invalid(format!(
                    "min_equal_digits must be at least 2, got {}",
                    n
                )));
            }
        }
        Ok(())
    }

    /// View-model settings derived from this configuration
    pub fn settings(&self) -> PasscodeSettings {
        PasscodeSettings {
            passcode_length: self.passcode_length,
            reset_when_enter_background: self.reset_when_enter_background,
            request_biometrics_when_enter_foreground: self.request_biometrics_when_enter_foreground,
        }
    }

    /// Validation rules derived from this configuration
    pub fn validator(&self) -> PasscodeValidator {
        let validator = PasscodeValidator::default();
        match self.min_equal_digits {
            Some(n) => validator.with_rule(EqualDigitsRule::new(n).with_text(
                "Too simple",
                format!("Avoid {} or more equal digits in a row", n),
            )),
            None => validator,
        }
    }
}
