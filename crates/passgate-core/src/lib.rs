//! Passgate - Passcode flows for PIN entry screens
//!
//! This crate provides the logic behind a numeric passcode screen:
//! - Create, change and enter flows as independent state machines
//! - Validation rules checked on every keystroke
//! - Argon2id-hashed passcode storage (memory or file)
//! - Biometric unlock through an async service, applied on the owner's thread
//! - Background/foreground hooks and flow chaining
//!
//! Rendering is left to the host; see the `passgate-tui` crate for a terminal
//! front end.

pub mod biometrics;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod keypad;
pub mod lifecycle;
pub mod state;
pub mod storage;
pub mod validation;
pub mod view_model;

pub use biometrics::{BiometricsParameters, BiometricsService, UnavailableBiometrics};
pub use config::PasscodeConfig;
pub use error::{BiometricsError, ConfigError, PasscodeError, Result, StorageError};
pub use events::{FlowEvent, FlowTicket};
pub use flow::{
    ChangeFlowCoordinator, CreateFlowCoordinator, EnterFlowCoordinator, FlowChain,
    FlowCoordinator, FlowOrchestrator, StandardCoordinatorFactory,
};
pub use keypad::{Digit, Keypad, PassCodeButtonItem};
pub use lifecycle::{LifecycleEvent, LifecycleHub};
pub use state::{CodeInputState, FlowError, PassCodeFlowType, PassCodeState};
pub use storage::{FilePasscodeStorage, MemoryPasscodeStorage, PasscodeStorage};
pub use validation::{EqualDigitsRule, PasscodeValidator, RuleViolation, ValidationRule};
pub use view_model::{
    ButtonOutcome, ChannelDelegate, DigitOutcome, PasscodeSettings, PasscodeViewModel,
    PasscodeViewModelDelegate, ViewModelEvent,
};
