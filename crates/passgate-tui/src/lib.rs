//! Passgate terminal front end
//!
//! Drives the passcode flows from `passgate-core` with a keyboard-operated
//! keypad, a simulated biometric sensor and simulated app lifecycle events.

pub mod app;
pub mod biometrics;
pub mod ui;

pub use app::App;
