//! Unlock with the stored passcode or biometrics

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{AttemptBudget, FlowCoordinator, SupportsBiometrics};
use crate::biometrics::{BiometricsOutcome, BiometricsParameters, BiometricsService};
use crate::error::Result;
use crate::events::FlowContext;
use crate::state::{CodeInputState, FlowError, PassCodeFlowType, PassCodeState};
use crate::storage::PasscodeStorage;

/// Checks the user against the stored passcode
///
/// When the biometric service is available, starting the flow also starts a
/// challenge. A failed challenge falls back to the keypad without costing an
/// attempt.
pub struct EnterFlowCoordinator {
    storage: Arc<dyn PasscodeStorage>,
    biometrics: Arc<dyn BiometricsService>,
    parameters: BiometricsParameters,
    title: String,
    attempts: AttemptBudget,
    finished: Option<PassCodeState>,
}

impl EnterFlowCoordinator {
    /// # Panics
    /// Panics if `max_attempts` is zero.
    pub fn new(
        storage: Arc<dyn PasscodeStorage>,
        biometrics: Arc<dyn BiometricsService>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            biometrics,
            parameters: BiometricsParameters::default(),
            title: "Enter passcode".to_string(),
            attempts: AttemptBudget::new(max_attempts),
            finished: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_parameters(mut self, parameters: BiometricsParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts.remaining()
    }

    fn lockout() -> PassCodeState {
        PassCodeState::finished(Some(FlowError::TooManyAttempts), PassCodeFlowType::Enter)
    }

    fn unlocked(&mut self) -> PassCodeState {
        let state = PassCodeState::finished(None, PassCodeFlowType::Enter);
        self.finished = Some(state.clone());
        state
    }
}

impl FlowCoordinator for EnterFlowCoordinator {
    fn flow_type(&self) -> PassCodeFlowType {
        PassCodeFlowType::Enter
    }

    fn initial_state(&self) -> PassCodeState {
        PassCodeState::entering(None, CodeInputState::CURRENT)
    }

    fn start_flow(&mut self, ctx: &FlowContext) -> PassCodeState {
        self.authenticate_using_biometrics(ctx)
    }

    fn did_finish_enter(&mut self, code: &str) -> Result<PassCodeState> {
        if let Some(state) = &self.finished {
            warn!("Ignoring code entered after enter flow finished");
            return Ok(state.clone());
        }

        if self.storage.load_and_compare(code)? {
            info!("Unlocked with passcode");
            return Ok(self.unlocked());
        }

        match self.attempts.consume() {
            Some(attempts_remaining) => {
                debug!("Wrong passcode, {} attempts remaining", attempts_remaining);
                Ok(PassCodeState::entering(
                    Some(FlowError::WrongCode { attempts_remaining }),
                    CodeInputState::CURRENT,
                ))
            }
            None => {
                warn!("Enter flow locked out after {} wrong codes", self.attempts.max());
                let state = Self::lockout();
                self.finished = Some(state.clone());
                Ok(state)
            }
        }
    }

    fn reset(&mut self) -> PassCodeState {
        self.attempts = AttemptBudget::new(self.attempts.max());
        self.finished = None;
        self.initial_state()
    }

    fn current_state_title(&self) -> &str {
        &self.title
    }

    fn as_biometrics(&self) -> Option<&dyn SupportsBiometrics> {
        Some(self)
    }

    fn as_biometrics_mut(&mut self) -> Option<&mut dyn SupportsBiometrics> {
        Some(self)
    }
}

impl SupportsBiometrics for EnterFlowCoordinator {
    fn can_authenticate_with_biometrics(&self) -> bool {
        self.biometrics.can_authenticate()
    }

    fn authenticate_using_biometrics(&mut self, ctx: &FlowContext) -> PassCodeState {
        if let Some(state) = &self.finished {
            return state.clone();
        }

        if !self.can_authenticate_with_biometrics() {
            debug!("Biometrics unavailable, asking for passcode");
            return PassCodeState::entering(None, CodeInputState::CURRENT);
        }

        debug!("Starting biometric challenge {}", ctx.ticket());
        ctx.biometrics_reply()
            .spawn(self.biometrics.clone(), self.parameters.clone());
        PassCodeState::entering(None, CodeInputState::CURRENT | CodeInputState::BIOMETRICS)
    }

    fn did_finish_biometrics(&mut self, outcome: BiometricsOutcome) -> PassCodeState {
        if let Some(state) = &self.finished {
            debug!("Ignoring biometric result after enter flow finished");
            return state.clone();
        }

        match outcome {
            Ok(()) => {
                info!("Unlocked with biometrics");
                self.unlocked()
            }
            Err(e) => {
                info!("{}, falling back to passcode", e);
                PassCodeState::entering(None, CodeInputState::CURRENT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BiometricsError;
    use crate::events::{FlowEvent, FlowTicket};
    use crate::storage::{HashParams, MemoryPasscodeStorage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct CountingBiometrics {
        available: bool,
        verdict: BiometricsOutcome,
        calls: AtomicUsize,
    }

    impl CountingBiometrics {
        fn new(available: bool, verdict: BiometricsOutcome) -> Arc<Self> {
            Arc::new(Self {
                available,
                verdict,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BiometricsService for CountingBiometrics {
        fn can_authenticate(&self) -> bool {
            self.available
        }

        async fn authenticate(&self, _parameters: &BiometricsParameters) -> BiometricsOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone()
        }
    }

    fn setup(
        biometrics: Arc<CountingBiometrics>,
        max_attempts: u32,
    ) -> (EnterFlowCoordinator, FlowContext, mpsc::UnboundedReceiver<FlowEvent>) {
        let storage = Arc::new(MemoryPasscodeStorage::with_params(HashParams::minimal()));
        storage.store("1234").unwrap();
        let coordinator = EnterFlowCoordinator::new(storage, biometrics, max_attempts);
        let (tx, rx) = mpsc::unbounded_channel();
        (coordinator, FlowContext::new(FlowTicket::first(), tx), rx)
    }

    #[test]
    fn test_correct_code_unlocks() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(false, Ok(())), 3);
        let state = coordinator.did_finish_enter("1234").unwrap();
        assert_eq!(state, PassCodeState::finished(None, PassCodeFlowType::Enter));
        assert_eq!(coordinator.did_finish_enter("0000").unwrap(), state);
    }

    #[test]
    fn test_wrong_codes_lock_out() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(false, Ok(())), 2);

        assert_eq!(
            coordinator.did_finish_enter("0000").unwrap().flow_error(),
            Some(&FlowError::WrongCode { attempts_remaining: 1 })
        );
        assert_eq!(
            coordinator.did_finish_enter("0000").unwrap(),
            EnterFlowCoordinator::lockout()
        );
        assert_eq!(
            coordinator.did_finish_enter("1234").unwrap(),
            EnterFlowCoordinator::lockout()
        );
    }

    #[test]
    fn test_reset_after_lockout_allows_unlock() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(false, Ok(())), 1);
        assert_eq!(
            coordinator.did_finish_enter("0000").unwrap(),
            EnterFlowCoordinator::lockout()
        );

        assert_eq!(
            coordinator.reset(),
            PassCodeState::entering(None, CodeInputState::CURRENT)
        );
        assert_eq!(coordinator.attempts_remaining(), 1);
        assert!(coordinator.did_finish_enter("1234").unwrap().is_success());
    }

    #[test]
    fn test_reset_refills_attempts() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(false, Ok(())), 3);
        coordinator.did_finish_enter("0000").unwrap();
        assert_eq!(coordinator.attempts_remaining(), 2);

        coordinator.reset();
        assert_eq!(coordinator.attempts_remaining(), 3);
    }

    #[test]
    fn test_no_challenge_when_unavailable() {
        let biometrics = CountingBiometrics::new(false, Ok(()));
        let (mut coordinator, ctx, mut rx) = setup(biometrics.clone(), 3);

        let state = coordinator.start_flow(&ctx);
        assert_eq!(state, PassCodeState::entering(None, CodeInputState::CURRENT));
        assert!(rx.try_recv().is_err());
        assert_eq!(biometrics.calls(), 0);
    }

    #[tokio::test]
    async fn test_start_flow_runs_one_challenge() {
        let biometrics = CountingBiometrics::new(true, Ok(()));
        let (mut coordinator, ctx, mut rx) = setup(biometrics.clone(), 3);

        let state = coordinator.start_flow(&ctx);
        assert_eq!(
            state.input_state(),
            Some(CodeInputState::CURRENT | CodeInputState::BIOMETRICS)
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            FlowEvent::Biometrics {
                ticket: FlowTicket::first(),
                outcome: Ok(()),
            }
        );
        assert_eq!(biometrics.calls(), 1);

        assert!(coordinator.did_finish_biometrics(Ok(())).is_success());
    }

    #[test]
    fn test_failed_biometrics_keeps_attempts() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(true, Ok(())), 3);

        let state = coordinator.did_finish_biometrics(Err(BiometricsError::Cancelled));
        assert_eq!(state, PassCodeState::entering(None, CodeInputState::CURRENT));
        assert_eq!(coordinator.attempts_remaining(), 3);
    }

    #[test]
    fn test_late_biometrics_after_finish_ignored() {
        let (mut coordinator, _ctx, _rx) = setup(CountingBiometrics::new(true, Ok(())), 1);
        let locked = coordinator.did_finish_enter("0000").unwrap();

        assert_eq!(coordinator.did_finish_biometrics(Ok(())), locked);
    }

    #[test]
    fn test_capability_exposed() {
        let (coordinator, _ctx, _rx) = setup(CountingBiometrics::new(true, Ok(())), 3);
        let capability = coordinator.as_biometrics().unwrap();
        assert!(capability.can_authenticate_with_biometrics());
    }
}
