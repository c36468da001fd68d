//! Application state

use passgate_core::{CodeInputState, PassCodeFlowType, PassCodeState, RuleViolation};

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Keypad and dot row
    #[default]
    Passcode,

    /// Too many wrong codes
    Lockout,
}

/// What the screen shows besides the view-model's own counters
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub current_screen: Screen,

    /// Input flags of the latest `Entering` state
    pub input_state: Option<CodeInputState>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Error message to display
    pub error_message: Option<String>,

    /// Flows completed this session, oldest first
    pub completed_flows: Vec<PassCodeFlowType>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a coordinator state
    pub fn apply_state(&mut self, state: &PassCodeState) {
        match state {
            PassCodeState::Entering { error, input_state } => {
                self.current_screen = Screen::Passcode;
                self.input_state = Some(*input_state);
                self.error_message = error.as_ref().map(ToString::to_string);
            }
            PassCodeState::Finished {
                error: None,
                flow_type,
            } => {
                self.input_state = None;
                self.error_message = None;
                self.status_message = Some(success_message(flow_type));
                self.completed_flows.push(flow_type.clone());
            }
            PassCodeState::Finished {
                error: Some(error), ..
            } => {
                self.current_screen = Screen::Lockout;
                self.input_state = None;
                self.error_message = Some(error.to_string());
            }
        }
    }

    /// Record a validation failure
    pub fn apply_violations(&mut self, failed_rules: &[RuleViolation]) {
        let text: Vec<String> = failed_rules.iter().map(ToString::to_string).collect();
        self.error_message = Some(text.join("; "));
    }

    /// True while a biometric prompt is up
    pub fn awaiting_biometrics(&self) -> bool {
        self.input_state.map_or(false, CodeInputState::is_biometrics)
    }

    /// Clear status messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

fn success_message(flow_type: &PassCodeFlowType) -> String {
    match flow_type {
        PassCodeFlowType::Create => "Passcode created".to_string(),
        PassCodeFlowType::Change => "Passcode changed".to_string(),
        PassCodeFlowType::Enter => "Unlocked".to_string(),
        PassCodeFlowType::Custom(id) => format!("{} finished", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passgate_core::FlowError;

    #[test]
    fn test_wrong_code_shows_error() {
        let mut state = AppState::new();
        state.apply_state(&PassCodeState::entering(
            Some(FlowError::WrongCode { attempts_remaining: 2 }),
            CodeInputState::CURRENT,
        ));

        assert_eq!(state.current_screen, Screen::Passcode);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Wrong passcode (2 attempts remaining)")
        );
        assert!(!state.awaiting_biometrics());
    }

    #[test]
    fn test_lockout_switches_screen() {
        let mut state = AppState::new();
        state.apply_state(&PassCodeState::finished(
            Some(FlowError::TooManyAttempts),
            PassCodeFlowType::Enter,
        ));
        assert_eq!(state.current_screen, Screen::Lockout);
    }

    #[test]
    fn test_success_recorded() {
        let mut state = AppState::new();
        state.apply_state(&PassCodeState::entering(
            None,
            CodeInputState::CURRENT | CodeInputState::BIOMETRICS,
        ));
        assert!(state.awaiting_biometrics());

        state.apply_state(&PassCodeState::finished(None, PassCodeFlowType::Enter));
        assert_eq!(state.status_message.as_deref(), Some("Unlocked"));
        assert_eq!(state.completed_flows, vec![PassCodeFlowType::Enter]);
        assert!(!state.awaiting_biometrics());
    }
}
