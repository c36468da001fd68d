//! Biometric authentication contract
//!
//! The platform sensor lives outside this crate. A host wraps it in a
//! [`BiometricsService`]; coordinators only ever await it from a spawned task
//! and hand the verdict back through the view-model's event queue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BiometricsError;

/// Result of one biometric challenge
pub type BiometricsOutcome = Result<(), BiometricsError>;

/// Text shown on the system biometric prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricsParameters {
    /// Why the app is asking
    pub reason: String,
    /// Alternative action button, e.g. "Enter passcode"
    #[serde(default)]
    pub fallback_title: Option<String>,
    /// Cancel button
    #[serde(default)]
    pub cancel_title: Option<String>,
}

impl Default for BiometricsParameters {
    fn default() -> Self {
        Self {
            reason: "Unlock with biometrics".to_string(),
            fallback_title: Some("Enter passcode".to_string()),
            cancel_title: None,
        }
    }
}

/// Platform biometric sensor
#[async_trait]
pub trait BiometricsService: Send + Sync {
    /// True if the device can run a biometric challenge right now
    fn can_authenticate(&self) -> bool;

    /// Present the challenge and wait for the verdict
    async fn authenticate(&self, parameters: &BiometricsParameters) -> BiometricsOutcome;
}

/// Service for devices without a sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBiometrics;

#[async_trait]
impl BiometricsService for UnavailableBiometrics {
    fn can_authenticate(&self) -> bool {
        false
    }

    async fn authenticate(&self, _parameters: &BiometricsParameters) -> BiometricsOutcome {
        Err(BiometricsError::Unavailable)
    }
}
