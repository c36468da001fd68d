//! Screen implementations

pub mod lockout;
pub mod passcode;
