//! Simulated biometric sensor for terminals

use std::time::Duration;

use async_trait::async_trait;
use passgate_core::biometrics::BiometricsOutcome;
use passgate_core::{BiometricsError, BiometricsParameters, BiometricsService};
use rand::Rng;

use crate::app::BiometricsMode;

/// Sensor that answers after a fixed delay according to its mode
#[derive(Debug, Clone)]
pub struct SimulatedBiometrics {
    mode: BiometricsMode,
    delay: Duration,
}

impl SimulatedBiometrics {
    pub fn new(mode: BiometricsMode, delay: Duration) -> Self {
        Self { mode, delay }
    }

    pub fn mode(&self) -> BiometricsMode {
        self.mode
    }
}

#[async_trait]
impl BiometricsService for SimulatedBiometrics {
    fn can_authenticate(&self) -> bool {
        self.mode != BiometricsMode::Off
    }

    async fn authenticate(&self, parameters: &BiometricsParameters) -> BiometricsOutcome {
        let approve = match self.mode {
            BiometricsMode::Off => return Err(BiometricsError::Unavailable),
            BiometricsMode::Approve => true,
            BiometricsMode::Deny => false,
            BiometricsMode::Random => rand::thread_rng().gen_bool(0.5),
        };

        tracing::debug!("Simulated biometric prompt: {}", parameters.reason);
        tokio::time::sleep(self.delay).await;

        if approve {
            Ok(())
        } else {
            Err(BiometricsError::Failed("fingerprint not recognised".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BiometricsMode::Off, false)]
    #[case(BiometricsMode::Approve, true)]
    #[case(BiometricsMode::Deny, true)]
    #[case(BiometricsMode::Random, true)]
    fn test_availability(#[case] mode: BiometricsMode, #[case] available: bool) {
        let sensor = SimulatedBiometrics::new(mode, Duration::ZERO);
        assert_eq!(sensor.can_authenticate(), available);
    }

    #[tokio::test]
    async fn test_verdicts() {
        let params = BiometricsParameters::default();

        let approve = SimulatedBiometrics::new(BiometricsMode::Approve, Duration::ZERO);
        assert_eq!(approve.authenticate(&params).await, Ok(()));

        let deny = SimulatedBiometrics::new(BiometricsMode::Deny, Duration::ZERO);
        assert!(matches!(
            deny.authenticate(&params).await,
            Err(BiometricsError::Failed(_))
        ));

        let off = SimulatedBiometrics::new(BiometricsMode::Off, Duration::ZERO);
        assert_eq!(
            off.authenticate(&params).await,
            Err(BiometricsError::Unavailable)
        );
    }
}
