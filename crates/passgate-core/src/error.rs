//! Error types for passcode storage, biometrics and configuration
//!
//! Flow outcomes such as a wrong code or a lockout are not errors here: they are
//! [`crate::state::FlowError`] values carried inside a state transition. The
//! types in this module cover infrastructure failures only.

use thiserror::Error;

/// Result type alias for passcode operations
pub type Result<T> = std::result::Result<T, PasscodeError>;

/// Errors surfaced by view-model and coordinator operations
#[derive(Debug, Error)]
pub enum PasscodeError {
    /// The storage backend failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised by a [`crate::storage::PasscodeStorage`] backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Hashing or hash parsing failed
    #[error("Hash error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Errors reported by a [`crate::biometrics::BiometricsService`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BiometricsError {
    /// No biometric sensor, or nothing enrolled
    #[error("Biometric authentication is not available")]
    Unavailable,

    /// The user dismissed the prompt
    #[error("Biometric authentication was cancelled")]
    Cancelled,

    /// The sensor rejected the user
    #[error("Biometric authentication failed: {0}")]
    Failed(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
