//! First-time passcode creation: enter, then repeat

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::{FlowCoordinator, FlowTitles};
use crate::error::Result;
use crate::state::{CodeInputState, FlowError, PassCodeFlowType, PassCodeState};
use crate::storage::PasscodeStorage;

enum CreatePhase {
    AwaitingFirst,
    AwaitingConfirm(Zeroizing<String>),
}

/// Asks for a new code twice and stores it when both entries match
///
/// Mismatches start over from the first entry and never count against the
/// user.
pub struct CreateFlowCoordinator {
    storage: Arc<dyn PasscodeStorage>,
    titles: FlowTitles,
    phase: CreatePhase,
    finished: Option<PassCodeState>,
}

impl CreateFlowCoordinator {
    pub fn new(storage: Arc<dyn PasscodeStorage>) -> Self {
        Self {
            storage,
            titles: FlowTitles::default(),
            phase: CreatePhase::AwaitingFirst,
            finished: None,
        }
    }

    pub fn with_titles(mut self, titles: FlowTitles) -> Self {
        self.titles = titles;
        self
    }
}

impl FlowCoordinator for CreateFlowCoordinator {
    fn flow_type(&self) -> PassCodeFlowType {
        PassCodeFlowType::Create
    }

    fn initial_state(&self) -> PassCodeState {
        PassCodeState::entering(None, CodeInputState::NEW)
    }

    fn did_finish_enter(&mut self, code: &str) -> Result<PassCodeState> {
        if let Some(state) = &self.finished {
            warn!("Ignoring code entered after create flow finished");
            return Ok(state.clone());
        }

        let confirmed = match &self.phase {
            CreatePhase::AwaitingFirst => None,
            CreatePhase::AwaitingConfirm(pending) => Some(pending.as_str() == code),
        };

        let state = match confirmed {
            None => {
                self.phase = CreatePhase::AwaitingConfirm(Zeroizing::new(code.to_owned()));
                debug!("Create flow: first entry taken, awaiting confirmation");
                PassCodeState::entering(None, CodeInputState::NEW | CodeInputState::REPEAT)
            }
            Some(true) => {
                self.storage.store(code)?;
                self.phase = CreatePhase::AwaitingFirst;
                info!("Passcode created");
                let state = PassCodeState::finished(None, PassCodeFlowType::Create);
                self.finished = Some(state.clone());
                state
            }
            Some(false) => {
                self.phase = CreatePhase::AwaitingFirst;
                debug!("Create flow: confirmation did not match");
                PassCodeState::entering(Some(FlowError::CodesNotMatch), CodeInputState::NEW)
            }
        };

        Ok(state)
    }

    fn reset(&mut self) -> PassCodeState {
        self.phase = CreatePhase::AwaitingFirst;
        self.finished = None;
        self.initial_state()
    }

    fn current_state_title(&self) -> &str {
        match self.phase {
            CreatePhase::AwaitingFirst => &self.titles.enter_new,
            CreatePhase::AwaitingConfirm(_) => &self.titles.repeat_new,
        }
    }
}
