//! Flow states produced by coordinators

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

/// Which coordinator produced a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PassCodeFlowType {
    /// First-time passcode creation
    Create,
    /// Replace the stored passcode (verify current, enter new, confirm)
    Change,
    /// Unlock with the stored passcode or biometrics
    Enter,
    /// Application-defined flow
    Custom(String),
}

impl fmt::Display for PassCodeFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassCodeFlowType::Create => write!(f, "create"),
            PassCodeFlowType::Change => write!(f, "change"),
            PassCodeFlowType::Enter => write!(f, "enter"),
            PassCodeFlowType::Custom(id) => write!(f, "custom:{}", id),
        }
    }
}

bitflags! {
    /// Set of flags describing what kind of input is being solicited
    ///
    /// `NEW | REPEAT` reads as "confirm the new code just entered".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CodeInputState: u8 {
        /// Typing the passcode currently in use (enter or change flow)
        const CURRENT = 1 << 0;
        /// Typing a new passcode (create or change flow)
        const NEW = 1 << 1;
        /// Typing the same code again
        const REPEAT = 1 << 2;
        /// A biometric prompt is being presented
        const BIOMETRICS = 1 << 3;
    }
}

impl CodeInputState {
    /// Build from raw bits, rejecting empty sets and unknown flags
    pub fn try_from_bits(bits: u8) -> Option<Self> {
        Self::from_bits(bits).filter(|state| !state.is_empty())
    }

    pub fn is_current(self) -> bool {
        self.contains(Self::CURRENT)
    }

    pub fn is_new(self) -> bool {
        self.contains(Self::NEW)
    }

    pub fn is_repeat(self) -> bool {
        self.contains(Self::REPEAT)
    }

    pub fn is_biometrics(self) -> bool {
        self.contains(Self::BIOMETRICS)
    }

    /// Input may only be solicited under a current or new label
    pub fn has_input_label(self) -> bool {
        self.intersects(Self::CURRENT | Self::NEW)
    }
}

impl fmt::Display for CodeInputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Errors a flow reports to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Wrong passcode ({attempts_remaining} attempts remaining)")]
    WrongCode { attempts_remaining: u32 },

    #[error("Passcodes do not match")]
    CodesNotMatch,

    #[error("Too many failed attempts")]
    TooManyAttempts,
}

/// State of a flow coordinator after an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassCodeState {
    /// Awaiting a digit or backspace
    Entering {
        error: Option<FlowError>,
        input_state: CodeInputState,
    },
    /// Terminal for this coordinator; `error == None` is success
    Finished {
        error: Option<FlowError>,
        flow_type: PassCodeFlowType,
    },
}

impl PassCodeState {
    /// Entering state with the input-label invariant checked
    pub fn entering(error: Option<FlowError>, input_state: CodeInputState) -> Self {
        debug_assert!(
            input_state.has_input_label(),
            "input solicited without a current/new label: {}",
            input_state
        );
        PassCodeState::Entering { error, input_state }
    }

    pub fn finished(error: Option<FlowError>, flow_type: PassCodeFlowType) -> Self {
        PassCodeState::Finished { error, flow_type }
    }

    /// Error attached to this state, if any
    pub fn flow_error(&self) -> Option<&FlowError> {
        match self {
            PassCodeState::Entering { error, .. } | PassCodeState::Finished { error, .. } => {
                error.as_ref()
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PassCodeState::Finished { .. })
    }

    /// True for `Finished` with no error
    pub fn is_success(&self) -> bool {
        matches!(self, PassCodeState::Finished { error: None, .. })
    }

    /// Input flags while entering; `None` once finished
    pub fn input_state(&self) -> Option<CodeInputState> {
        match self {
            PassCodeState::Entering { input_state, .. } => Some(*input_state),
            PassCodeState::Finished { .. } => None,
        }
    }
}
