//! Keypad-facing view-model
//!
//! Collects digits, runs validation on every keystroke, submits complete codes
//! to the active coordinator and forwards each resulting state to a delegate.
//! All flow state is touched from the thread that owns the view-model;
//! asynchronous results are queued as [`FlowEvent`]s and applied by
//! [`PasscodeViewModel::pump`] or [`PasscodeViewModel::process_next_event`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::error::Result;
use crate::events::{FlowContext, FlowEvent, FlowTicket};
use crate::flow::FlowCoordinator;
use crate::keypad::{Digit, PassCodeButtonItem};
use crate::lifecycle::{LifecycleEvent, LifecycleHub, LifecycleSubscription};
use crate::state::{PassCodeFlowType, PassCodeState};
use crate::storage::PasscodeStorage;
use crate::validation::{PasscodeValidator, RuleViolation};

/// View-model behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasscodeSettings {
    /// Digits per code
    pub passcode_length: usize,
    /// Reset the flow when the app goes to the background
    pub reset_when_enter_background: bool,
    /// Ask for biometrics when the app returns to the foreground
    pub request_biometrics_when_enter_foreground: bool,
}

impl Default for PasscodeSettings {
    fn default() -> Self {
        Self {
            passcode_length: 4,
            reset_when_enter_background: false,
            request_biometrics_when_enter_foreground: true,
        }
    }
}

/// Receives view-model output
pub trait PasscodeViewModelDelegate: Send {
    /// The code typed so far breaks at least one rule
    fn invalid(&mut self, code: &str, failed_rules: &[RuleViolation]);

    /// The active coordinator moved to `state`
    fn transition(&mut self, state: &PassCodeState);
}

/// Delegate output as a channel message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewModelEvent {
    Invalid {
        /// Length of the rejected code; the code itself is never sent
        entered_len: usize,
        failed_rules: Vec<RuleViolation>,
    },
    Transition(PassCodeState),
}

/// Delegate that forwards everything to an unbounded channel
pub struct ChannelDelegate {
    tx: mpsc::UnboundedSender<ViewModelEvent>,
}

impl ChannelDelegate {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewModelEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: ViewModelEvent) {
        if self.tx.send(event).is_err() {
            debug!("View-model event dropped, receiver closed");
        }
    }
}

impl PasscodeViewModelDelegate for ChannelDelegate {
    fn invalid(&mut self, code: &str, failed_rules: &[RuleViolation]) {
        self.send(ViewModelEvent::Invalid {
            entered_len: code.len(),
            failed_rules: failed_rules.to_vec(),
        });
    }

    fn transition(&mut self, state: &PassCodeState) {
        self.send(ViewModelEvent::Transition(state.clone()));
    }
}

/// Result of a single digit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitOutcome {
    /// Accepted, more digits needed
    Pending { entered: usize },
    /// Rules broken; the caller should reset the entered code
    Invalid(Vec<RuleViolation>),
    /// The code was complete and went to the coordinator
    Submitted(PassCodeState),
    /// The code is already at full length
    Ignored,
}

/// Result of a keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonOutcome<C> {
    Digit(DigitOutcome),
    /// Backspace; false when there was nothing to remove
    Removed(bool),
    /// Biometrics button; `None` when the flow has no biometric support
    Biometrics(Option<PassCodeState>),
    /// Application payload, returned untouched
    Custom(C),
}

pub struct PasscodeViewModel {
    settings: PasscodeSettings,
    coordinator: Box<dyn FlowCoordinator>,
    ticket: FlowTicket,
    storage: Arc<dyn PasscodeStorage>,
    validator: PasscodeValidator,
    delegate: Option<Box<dyn PasscodeViewModelDelegate>>,
    entered: Zeroizing<String>,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    lifecycle: Option<LifecycleSubscription>,
}

impl PasscodeViewModel {
    /// # Panics
    /// Panics if `settings.passcode_length` is zero.
    pub fn new(
        settings: PasscodeSettings,
        coordinator: Box<dyn FlowCoordinator>,
        storage: Arc<dyn PasscodeStorage>,
    ) -> Self {
        assert!(settings.passcode_length > 0, "passcode length must be positive");
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            settings,
            coordinator,
            ticket: FlowTicket::first(),
            storage,
            validator: PasscodeValidator::default(),
            delegate: None,
            entered: Zeroizing::new(String::with_capacity(settings.passcode_length)),
            events_tx,
            events_rx,
            lifecycle: None,
        }
    }

    pub fn with_validator(mut self, validator: PasscodeValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_delegate(mut self, delegate: impl PasscodeViewModelDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    /// Follow host lifecycle events
    ///
    /// Nothing is subscribed when both lifecycle settings are off. The
    /// subscription ends when the view-model is dropped.
    pub fn bind_lifecycle(&mut self, hub: &LifecycleHub) {
        if !self.settings.reset_when_enter_background
            && !self.settings.request_biometrics_when_enter_foreground
        {
            debug!("Lifecycle events disabled by settings");
            return;
        }
        self.lifecycle = Some(hub.subscribe(self.events_tx.clone()));
    }

    /// True while subscribed to a [`LifecycleHub`]
    pub fn is_lifecycle_bound(&self) -> bool {
        self.lifecycle.is_some()
    }

    pub fn settings(&self) -> &PasscodeSettings {
        &self.settings
    }

    pub fn passcode_length(&self) -> usize {
        self.settings.passcode_length
    }

    pub fn entered_digits_count(&self) -> usize {
        self.entered.len()
    }

    pub fn state_title(&self) -> &str {
        self.coordinator.current_state_title()
    }

    pub fn flow_type(&self) -> PassCodeFlowType {
        self.coordinator.flow_type()
    }

    pub fn can_authenticate_with_biometrics(&self) -> bool {
        self.coordinator
            .as_biometrics()
            .map_or(false, |b| b.can_authenticate_with_biometrics())
    }

    pub fn current_ticket(&self) -> FlowTicket {
        self.ticket
    }

    fn context(&self) -> FlowContext {
        FlowContext::new(self.ticket, self.events_tx.clone())
    }

    fn forward(&mut self, state: &PassCodeState) {
        debug!("{} flow {}: {:?}", self.coordinator.flow_type(), self.ticket, state);
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.transition(state);
        }
    }

    /// Append a digit, validate, and submit once the code is complete
    ///
    /// The buffer is cleared after every submission, including one that fails
    /// with a storage error.
    pub fn did_enter_digit(&mut self, digit: Digit) -> Result<DigitOutcome> {
        if self.entered.len() >= self.settings.passcode_length {
            debug!("Ignoring digit beyond passcode length");
            return Ok(DigitOutcome::Ignored);
        }
        self.entered.push(digit.as_char());

        let violations = self.validator.validate(&self.entered);
        if !violations.is_empty() {
            debug!("Entered code breaks {} rule(s)", violations.len());
            if let Some(delegate) = self.delegate.as_mut() {
                delegate.invalid(&self.entered, &violations);
            }
            return Ok(DigitOutcome::Invalid(violations));
        }

        if self.entered.len() < self.settings.passcode_length {
            return Ok(DigitOutcome::Pending {
                entered: self.entered.len(),
            });
        }

        let code = std::mem::replace(
            &mut self.entered,
            Zeroizing::new(String::with_capacity(self.settings.passcode_length)),
        );
        let state = self.coordinator.did_finish_enter(&code)?;
        self.forward(&state);
        Ok(DigitOutcome::Submitted(state))
    }

    /// Remove the last digit; false if nothing was entered
    pub fn did_remove_last_digit(&mut self) -> bool {
        self.entered.pop().is_some()
    }

    /// Clear the entered code without notifying the delegate
    pub fn reset_entered_code(&mut self) {
        self.entered.zeroize();
    }

    /// Ask the active coordinator for a biometric challenge
    ///
    /// Returns `None` when the flow has no biometric support.
    pub fn did_request_biometrics(&mut self) -> Option<PassCodeState> {
        let ctx = self.context();
        let biometrics = self.coordinator.as_biometrics_mut()?;
        let state = biometrics.authenticate_using_biometrics(&ctx);
        self.forward(&state);
        Some(state)
    }

    pub fn start_flow(&mut self) -> PassCodeState {
        let ctx = self.context();
        let state = self.coordinator.start_flow(&ctx);
        info!("Started {} flow {}", self.coordinator.flow_type(), self.ticket);
        self.forward(&state);
        state
    }

    /// Drop entered digits and restart the active coordinator
    ///
    /// Biometric results requested before the reset are discarded.
    pub fn reset_flow(&mut self) -> PassCodeState {
        self.entered.zeroize();
        self.ticket = self.ticket.next_generation();
        let state = self.coordinator.reset();
        self.forward(&state);
        state
    }

    /// Forget the stored passcode
    pub fn reset_stored_code(&mut self) -> Result<()> {
        self.storage.clear()?;
        info!("Stored passcode cleared");
        Ok(())
    }

    /// Replace the active coordinator
    ///
    /// Does not start the new flow; call [`Self::start_flow`] for that.
    pub fn update_coordinator(&mut self, coordinator: Box<dyn FlowCoordinator>) {
        self.entered.zeroize();
        self.ticket = self.ticket.next_coordinator();
        info!(
            "Switching from {} to {} flow ({})",
            self.coordinator.flow_type(),
            coordinator.flow_type(),
            self.ticket
        );
        self.coordinator = coordinator;
    }

    /// Dispatch a keypad button
    pub fn handle_button<C>(&mut self, item: PassCodeButtonItem<C>) -> Result<ButtonOutcome<C>> {
        let outcome = match item {
            PassCodeButtonItem::Digit(digit) => ButtonOutcome::Digit(self.did_enter_digit(digit)?),
            PassCodeButtonItem::Backspace => ButtonOutcome::Removed(self.did_remove_last_digit()),
            PassCodeButtonItem::Biometrics => {
                ButtonOutcome::Biometrics(self.did_request_biometrics())
            }
            PassCodeButtonItem::Custom(payload) => ButtonOutcome::Custom(payload),
        };
        Ok(outcome)
    }

    /// Apply every queued event without blocking; returns how many were handled
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next queued event and apply it
    pub async fn process_next_event(&mut self) -> Option<FlowEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    fn handle_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Biometrics { ticket, outcome } => {
                if ticket != self.ticket {
                    warn!(
                        "Discarding stale biometric result {} (active {})",
                        ticket, self.ticket
                    );
                    return;
                }
                let Some(biometrics) = self.coordinator.as_biometrics_mut() else {
                    warn!("Biometric result for a flow without biometric support");
                    return;
                };
                let state = biometrics.did_finish_biometrics(outcome);
                if state.is_finished() {
                    self.entered.zeroize();
                }
                self.forward(&state);
            }
            FlowEvent::Lifecycle(LifecycleEvent::DidEnterBackground) => {
                if self.settings.reset_when_enter_background {
                    self.reset_flow();
                }
            }
            FlowEvent::Lifecycle(LifecycleEvent::WillEnterForeground) => {
                if self.settings.request_biometrics_when_enter_foreground {
                    self.did_request_biometrics();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biometrics::{
        BiometricsOutcome, BiometricsParameters, BiometricsService, UnavailableBiometrics,
    };
    use crate::error::BiometricsError;
    use crate::flow::{CreateFlowCoordinator, EnterFlowCoordinator};
    use crate::state::{CodeInputState, FlowError};
    use crate::storage::{HashParams, MemoryPasscodeStorage};
    use crate::validation::EqualDigitsRule;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBiometrics {
        verdict: BiometricsOutcome,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BiometricsService for FixedBiometrics {
        fn can_authenticate(&self) -> bool {
            true
        }

        async fn authenticate(&self, _parameters: &BiometricsParameters) -> BiometricsOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone()
        }
    }

    fn digits(code: &str) -> impl Iterator<Item = Digit> + '_ {
        code.chars().map(|c| Digit::try_from(c).unwrap())
    }

    fn storage() -> Arc<MemoryPasscodeStorage> {
        Arc::new(MemoryPasscodeStorage::with_params(HashParams::minimal()))
    }

    fn create_vm(
        settings: PasscodeSettings,
    ) -> (PasscodeViewModel, mpsc::UnboundedReceiver<ViewModelEvent>) {
        let storage = storage();
        let (delegate, rx) = ChannelDelegate::channel();
        let vm = PasscodeViewModel::new(
            settings,
            Box::new(CreateFlowCoordinator::new(storage.clone())),
            storage,
        )
        .with_validator(PasscodeValidator::default().with_rule(EqualDigitsRule::new(4)))
        .with_delegate(delegate);
        (vm, rx)
    }

    fn enter_vm(
        settings: PasscodeSettings,
        verdict: BiometricsOutcome,
    ) -> (PasscodeViewModel, Arc<FixedBiometrics>) {
        let storage = storage();
        storage.store("2580").unwrap();
        let biometrics = Arc::new(FixedBiometrics {
            verdict,
            calls: AtomicUsize::new(0),
        });
        let coordinator = EnterFlowCoordinator::new(storage.clone(), biometrics.clone(), 3);
        (
            PasscodeViewModel::new(settings, Box::new(coordinator), storage),
            biometrics,
        )
    }

    fn enter_code(vm: &mut PasscodeViewModel, code: &str) -> DigitOutcome {
        let mut last = DigitOutcome::Ignored;
        for digit in digits(code) {
            last = vm.did_enter_digit(digit).unwrap();
        }
        last
    }

    #[test]
    fn test_digits_accumulate_then_submit() {
        let (mut vm, mut rx) = create_vm(PasscodeSettings::default());

        assert_eq!(
            vm.did_enter_digit(Digit::new(1).unwrap()).unwrap(),
            DigitOutcome::Pending { entered: 1 }
        );
        assert_eq!(vm.entered_digits_count(), 1);

        let outcome = enter_code(&mut vm, "234");
        let expected =
            PassCodeState::entering(None, CodeInputState::NEW | CodeInputState::REPEAT);
        assert_eq!(outcome, DigitOutcome::Submitted(expected.clone()));
        assert_eq!(vm.entered_digits_count(), 0);
        assert_eq!(rx.try_recv().unwrap(), ViewModelEvent::Transition(expected));
    }

    #[test]
    fn test_invalid_code_reported_and_kept() {
        let (mut vm, mut rx) = create_vm(PasscodeSettings::default());

        let outcome = enter_code(&mut vm, "1111");
        match outcome {
            DigitOutcome::Invalid(violations) => assert_eq!(violations[0].rule, "equal-digits"),
            other => panic!("expected invalid, got {:?}", other),
        }
        assert_eq!(vm.entered_digits_count(), 4);

        match rx.try_recv().unwrap() {
            ViewModelEvent::Invalid { entered_len, failed_rules } => {
                assert_eq!(entered_len, 4);
                assert_eq!(failed_rules.len(), 1);
            }
            other => panic!("unexpected event {:?}", other),
        }

        vm.reset_entered_code();
        assert_eq!(vm.entered_digits_count(), 0);
    }

    #[test]
    fn test_reset_entered_code_is_idempotent() {
        let (mut vm, mut rx) = create_vm(PasscodeSettings::default());
        enter_code(&mut vm, "12");

        vm.reset_entered_code();
        vm.reset_entered_code();
        assert_eq!(vm.entered_digits_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_backspace() {
        let (mut vm, _rx) = create_vm(PasscodeSettings::default());
        assert!(!vm.did_remove_last_digit());

        enter_code(&mut vm, "12");
        assert!(vm.did_remove_last_digit());
        assert_eq!(vm.entered_digits_count(), 1);
    }

    #[test]
    fn test_handle_button_returns_custom_payload() {
        let (mut vm, _rx) = create_vm(PasscodeSettings::default());

        let outcome = vm.handle_button(PassCodeButtonItem::Custom("forgot")).unwrap();
        assert_eq!(outcome, ButtonOutcome::Custom("forgot"));

        let outcome = vm
            .handle_button::<()>(PassCodeButtonItem::digit(5).unwrap())
            .unwrap();
        assert_eq!(outcome, ButtonOutcome::Digit(DigitOutcome::Pending { entered: 1 }));

        // Create flow has no biometric support
        let outcome = vm.handle_button::<()>(PassCodeButtonItem::Biometrics).unwrap();
        assert_eq!(outcome, ButtonOutcome::Biometrics(None));
        assert!(!vm.can_authenticate_with_biometrics());
    }

    #[test]
    fn test_update_coordinator_changes_ticket() {
        let (mut vm, _rx) = create_vm(PasscodeSettings::default());
        let first = vm.current_ticket();
        enter_code(&mut vm, "12");

        let storage = storage();
        vm.update_coordinator(Box::new(CreateFlowCoordinator::new(storage)));
        assert_ne!(vm.current_ticket(), first);
        assert_eq!(vm.entered_digits_count(), 0);
    }

    #[test]
    #[should_panic(expected = "passcode length must be positive")]
    fn test_zero_length_panics() {
        let storage = storage();
        let settings = PasscodeSettings {
            passcode_length: 0,
            ..PasscodeSettings::default()
        };
        let _ = PasscodeViewModel::new(
            settings,
            Box::new(CreateFlowCoordinator::new(storage.clone())),
            storage,
        );
    }

    #[tokio::test]
    async fn test_biometric_success_finishes_flow() {
        let (mut vm, biometrics) = enter_vm(PasscodeSettings::default(), Ok(()));

        let state = vm.start_flow();
        assert!(state.input_state().unwrap().is_biometrics());

        vm.process_next_event().await.unwrap();
        assert_eq!(biometrics.calls.load(Ordering::SeqCst), 1);
        assert!(vm.can_authenticate_with_biometrics());

        // Finished flows ignore further codes
        let outcome = enter_code(&mut vm, "0000");
        assert_eq!(
            outcome,
            DigitOutcome::Submitted(PassCodeState::finished(None, PassCodeFlowType::Enter))
        );
    }

    #[tokio::test]
    async fn test_biometric_failure_falls_back_to_code() {
        let (mut vm, _biometrics) =
            enter_vm(PasscodeSettings::default(), Err(BiometricsError::Cancelled));

        vm.start_flow();
        vm.process_next_event().await.unwrap();

        let outcome = enter_code(&mut vm, "1111");
        assert_eq!(
            outcome,
            DigitOutcome::Submitted(PassCodeState::entering(
                Some(FlowError::WrongCode { attempts_remaining: 2 }),
                CodeInputState::CURRENT,
            ))
        );
    }

    #[tokio::test]
    async fn test_stale_biometric_result_discarded() {
        let (mut vm, _biometrics) = enter_vm(PasscodeSettings::default(), Ok(()));

        vm.start_flow();
        vm.reset_flow();

        let event = vm.process_next_event().await.unwrap();
        assert!(matches!(event, FlowEvent::Biometrics { .. }));

        // The old challenge must not unlock the reset flow
        let outcome = enter_code(&mut vm, "1234");
        assert!(matches!(
            outcome,
            DigitOutcome::Submitted(PassCodeState::Entering { .. })
        ));
    }

    #[tokio::test]
    async fn test_verdict_for_replaced_coordinator_discarded() {
        let storage = storage();
        storage.store("2580").unwrap();
        let biometrics = Arc::new(FixedBiometrics {
            verdict: Ok(()),
            calls: AtomicUsize::new(0),
        });
        let (delegate, mut rx) = ChannelDelegate::channel();
        let mut vm = PasscodeViewModel::new(
            PasscodeSettings::default(),
            Box::new(EnterFlowCoordinator::new(storage.clone(), biometrics.clone(), 3)),
            storage.clone(),
        )
        .with_delegate(delegate);

        vm.start_flow();
        let old_ticket = vm.current_ticket();

        // Swap in a fresh enter flow before the approval arrives
        let replacement =
            EnterFlowCoordinator::new(storage.clone(), Arc::new(UnavailableBiometrics), 3);
        vm.update_coordinator(Box::new(replacement));
        assert_eq!(
            vm.start_flow(),
            PassCodeState::entering(None, CodeInputState::CURRENT)
        );
        while rx.try_recv().is_ok() {}

        let event = vm.process_next_event().await.unwrap();
        assert!(matches!(
            event,
            FlowEvent::Biometrics { ticket, outcome: Ok(()) } if ticket == old_ticket
        ));
        assert_eq!(biometrics.calls.load(Ordering::SeqCst), 1);

        // Nothing forwarded and the new flow keeps its full budget
        assert!(rx.try_recv().is_err());
        let outcome = enter_code(&mut vm, "1357");
        assert_eq!(
            outcome,
            DigitOutcome::Submitted(PassCodeState::entering(
                Some(FlowError::WrongCode { attempts_remaining: 2 }),
                CodeInputState::CURRENT,
            ))
        );
    }

    #[test]
    fn test_background_resets_flow_when_enabled() {
        let settings = PasscodeSettings {
            reset_when_enter_background: true,
            request_biometrics_when_enter_foreground: false,
            ..PasscodeSettings::default()
        };
        let (mut vm, _rx) = create_vm(settings);
        let hub = LifecycleHub::new();
        vm.bind_lifecycle(&hub);

        enter_code(&mut vm, "12");
        assert_eq!(hub.notify(LifecycleEvent::DidEnterBackground), 1);
        // Foreground is gated off and does nothing
        hub.notify(LifecycleEvent::WillEnterForeground);

        assert_eq!(vm.pump(), 2);
        assert_eq!(vm.entered_digits_count(), 0);
        assert_eq!(vm.current_ticket().generation, 1);
    }

    #[test]
    fn test_background_ignored_by_default() {
        let (mut vm, _rx) = create_vm(PasscodeSettings::default());
        let hub = LifecycleHub::new();
        vm.bind_lifecycle(&hub);

        enter_code(&mut vm, "12");
        hub.notify(LifecycleEvent::DidEnterBackground);
        vm.pump();
        assert_eq!(vm.entered_digits_count(), 2);
    }

    #[test]
    fn test_lifecycle_not_bound_when_disabled() {
        let settings = PasscodeSettings {
            reset_when_enter_background: false,
            request_biometrics_when_enter_foreground: false,
            ..PasscodeSettings::default()
        };
        let (mut vm, _rx) = create_vm(settings);
        let hub = LifecycleHub::new();
        vm.bind_lifecycle(&hub);
        assert!(!vm.is_lifecycle_bound());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_view_model_unsubscribes() {
        let (mut vm, _rx) = create_vm(PasscodeSettings::default());
        let hub = LifecycleHub::new();
        vm.bind_lifecycle(&hub);
        assert_eq!(hub.subscriber_count(), 1);

        drop(vm);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_foreground_requests_biometrics() {
        let (mut vm, biometrics) = enter_vm(PasscodeSettings::default(), Ok(()));
        let hub = LifecycleHub::new();
        vm.bind_lifecycle(&hub);

        hub.notify(LifecycleEvent::WillEnterForeground);
        let lifecycle = vm.process_next_event().await.unwrap();
        assert_eq!(lifecycle, FlowEvent::Lifecycle(LifecycleEvent::WillEnterForeground));

        vm.process_next_event().await.unwrap();
        assert_eq!(biometrics.calls.load(Ordering::SeqCst), 1);
    }
}
