//! Replace the stored passcode: verify current, enter new, confirm

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::{AttemptBudget, FlowCoordinator, FlowTitles};
use crate::error::Result;
use crate::state::{CodeInputState, FlowError, PassCodeFlowType, PassCodeState};
use crate::storage::PasscodeStorage;

enum ChangePhase {
    VerifyCurrent,
    EnterNew,
    ConfirmNew(Zeroizing<String>),
}

pub struct ChangeFlowCoordinator {
    storage: Arc<dyn PasscodeStorage>,
    titles: FlowTitles,
    attempts: AttemptBudget,
    phase: ChangePhase,
    finished: Option<PassCodeState>,
}

impl ChangeFlowCoordinator {
    /// # Panics
    /// Panics if `max_attempts` is zero.
    pub fn new(storage: Arc<dyn PasscodeStorage>, max_attempts: u32) -> Self {
        Self {
            storage,
            titles: FlowTitles::default(),
            attempts: AttemptBudget::new(max_attempts),
            phase: ChangePhase::VerifyCurrent,
            finished: None,
        }
    }

    pub fn with_titles(mut self, titles: FlowTitles) -> Self {
        self.titles = titles;
        self
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts.remaining()
    }

    fn lockout() -> PassCodeState {
        PassCodeState::finished(Some(FlowError::TooManyAttempts), PassCodeFlowType::Change)
    }

    fn verify_current(&mut self, code: &str) -> Result<PassCodeState> {
        if self.storage.load_and_compare(code)? {
            self.phase = ChangePhase::EnterNew;
            debug!("Change flow: current passcode verified");
            return Ok(PassCodeState::entering(None, CodeInputState::NEW));
        }

        match self.attempts.consume() {
            Some(attempts_remaining) => {
                debug!(
                    "Change flow: wrong current passcode, {} attempts remaining",
                    attempts_remaining
                );
                Ok(PassCodeState::entering(
                    Some(FlowError::WrongCode { attempts_remaining }),
                    CodeInputState::CURRENT,
                ))
            }
            None => {
                warn!("Change flow locked out after {} wrong codes", self.attempts.max());
                let state = Self::lockout();
                self.finished = Some(state.clone());
                Ok(state)
            }
        }
    }
}

impl FlowCoordinator for ChangeFlowCoordinator {
    fn flow_type(&self) -> PassCodeFlowType {
        PassCodeFlowType::Change
    }

    fn initial_state(&self) -> PassCodeState {
        PassCodeState::entering(None, CodeInputState::CURRENT)
    }

    fn did_finish_enter(&mut self, code: &str) -> Result<PassCodeState> {
        if let Some(state) = &self.finished {
            warn!("Ignoring code entered after change flow finished");
            return Ok(state.clone());
        }

        if matches!(self.phase, ChangePhase::VerifyCurrent) {
            return self.verify_current(code);
        }

        let confirmed = match &self.phase {
            ChangePhase::VerifyCurrent | ChangePhase::EnterNew => None,
            ChangePhase::ConfirmNew(pending) => Some(pending.as_str() == code),
        };

        let state = match confirmed {
            None => {
                self.phase = ChangePhase::ConfirmNew(Zeroizing::new(code.to_owned()));
                debug!("Change flow: new passcode taken, awaiting confirmation");
                PassCodeState::entering(None, CodeInputState::NEW | CodeInputState::REPEAT)
            }
            Some(true) => {
                self.storage.store(code)?;
                self.phase = ChangePhase::VerifyCurrent;
                info!("Passcode changed");
                let state = PassCodeState::finished(None, PassCodeFlowType::Change);
                self.finished = Some(state.clone());
                state
            }
            Some(false) => {
                // Back to the new code, the current one stays verified
                self.phase = ChangePhase::EnterNew;
                debug!("Change flow: confirmation did not match");
                PassCodeState::entering(Some(FlowError::CodesNotMatch), CodeInputState::NEW)
            }
        };

        Ok(state)
    }

    fn reset(&mut self) -> PassCodeState {
        self.phase = ChangePhase::VerifyCurrent;
        self.attempts = AttemptBudget::new(self.attempts.max());
        self.finished = None;
        self.initial_state()
    }

    fn current_state_title(&self) -> &str {
        match self.phase {
            ChangePhase::VerifyCurrent => &self.titles.enter_current,
            ChangePhase::EnterNew => &self.titles.enter_new,
            ChangePhase::ConfirmNew(_) => &self.titles.repeat_new,
        }
    }
}
