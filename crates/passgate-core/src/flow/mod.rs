//! Flow coordinators
//!
//! A coordinator is the state machine behind one passcode screen. The
//! view-model feeds it complete codes and biometric verdicts; the coordinator
//! answers with the next [`PassCodeState`]. Coordinators are independent
//! structs behind [`FlowCoordinator`]; moving from one flow to the next is
//! decided by the [`FlowOrchestrator`] table, not by the coordinators.

mod chain;
mod change;
mod create;
mod enter;

pub use chain::{
    ChainStep, CoordinatorFactory, FlowChain, FlowOrchestrator, StandardCoordinatorFactory,
};
pub use change::ChangeFlowCoordinator;
pub use create::CreateFlowCoordinator;
pub use enter::EnterFlowCoordinator;

use serde::{Deserialize, Serialize};

use crate::biometrics::BiometricsOutcome;
use crate::error::Result;
use crate::events::FlowContext;
use crate::state::{PassCodeFlowType, PassCodeState};

/// State machine for one passcode flow
pub trait FlowCoordinator: Send {
    /// Which flow this coordinator drives
    fn flow_type(&self) -> PassCodeFlowType;

    /// State presented before any input
    fn initial_state(&self) -> PassCodeState;

    /// Called once when the flow is shown
    fn start_flow(&mut self, _ctx: &FlowContext) -> PassCodeState {
        self.initial_state()
    }

    /// Handle a complete, validated code
    ///
    /// Wrong codes and mismatches are reported in the returned state; `Err` is
    /// reserved for storage failures.
    fn did_finish_enter(&mut self, code: &str) -> Result<PassCodeState>;

    /// Drop any pending input and return to the initial state
    ///
    /// Refills the attempt budget, so a locked-out flow can be tried again.
    fn reset(&mut self) -> PassCodeState;

    /// Title for the prompt currently shown
    fn current_state_title(&self) -> &str;

    /// Biometric capability, if this flow has one
    fn as_biometrics(&self) -> Option<&dyn SupportsBiometrics> {
        None
    }

    fn as_biometrics_mut(&mut self) -> Option<&mut dyn SupportsBiometrics> {
        None
    }
}

/// Coordinators that can unlock with a biometric challenge
pub trait SupportsBiometrics {
    fn can_authenticate_with_biometrics(&self) -> bool;

    /// Start a challenge; the verdict arrives later through the context's queue
    fn authenticate_using_biometrics(&mut self, ctx: &FlowContext) -> PassCodeState;

    /// Apply a verdict previously requested with this coordinator
    fn did_finish_biometrics(&mut self, outcome: BiometricsOutcome) -> PassCodeState;
}

/// Prompt titles shared by all coordinators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTitles {
    pub enter_current: String,
    pub enter_new: String,
    pub repeat_new: String,
}

impl Default for FlowTitles {
    fn default() -> Self {
        Self {
            enter_current: "Enter passcode".to_string(),
            enter_new: "Enter new passcode".to_string(),
            repeat_new: "Repeat passcode".to_string(),
        }
    }
}

/// Bounded number of wrong-code submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    max: u32,
    remaining: u32,
}

impl AttemptBudget {
    /// # Panics
    /// Panics if `max` is zero.
    pub fn new(max: u32) -> Self {
        assert!(max > 0, "max_attempts must allow at least one attempt");
        Self { max, remaining: max }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Record a wrong code; `None` once no attempts are left
    pub fn consume(&mut self) -> Option<u32> {
        self.remaining = self.remaining.saturating_sub(1);
        (self.remaining > 0).then_some(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_budget_counts_down() {
        let mut budget = AttemptBudget::new(3);
        assert_eq!(budget.consume(), Some(2));
        assert_eq!(budget.consume(), Some(1));
        assert_eq!(budget.consume(), None);
        assert!(budget.is_exhausted());
        assert_eq!(budget.consume(), None);
        assert_eq!(budget.max(), 3);
    }

    #[test]
    fn test_single_attempt() {
        let mut budget = AttemptBudget::new(1);
        assert_eq!(budget.remaining(), 1);
        assert_eq!(budget.consume(), None);
    }

    #[test]
    #[should_panic(expected = "at least one attempt")]
    fn test_zero_attempts_panics() {
        let _ = AttemptBudget::new(0);
    }

    #[test]
    fn test_titles_partial_json() {
        let titles: FlowTitles =
            serde_json::from_str(r#"{ "enter_new": "Choose a PIN" }"#).unwrap();
        assert_eq!(titles.enter_new, "Choose a PIN");
        assert_eq!(titles.repeat_new, "Repeat passcode");
    }
}
