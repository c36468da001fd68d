//! What happens after a flow succeeds
//!
//! The hand-off table maps a finished flow to the next one. A
//! [`CoordinatorFactory`] builds the coordinator for that flow and the
//! [`FlowOrchestrator`] installs it on the view-model.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ChangeFlowCoordinator, CreateFlowCoordinator, EnterFlowCoordinator, FlowCoordinator};
use crate::biometrics::BiometricsService;
use crate::config::PasscodeConfig;
use crate::error::{Result, StorageError};
use crate::state::{PassCodeFlowType, PassCodeState};
use crate::storage::PasscodeStorage;
use crate::view_model::PasscodeViewModel;

/// Next flow after a success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub next: PassCodeFlowType,
    /// Forget the stored passcode before starting `next`
    pub clear_stored_code: bool,
}

/// Hand-off table between flows
#[derive(Debug, Clone)]
pub struct FlowChain {
    steps: HashMap<PassCodeFlowType, ChainStep>,
}

impl Default for FlowChain {
    /// Create → Enter, Enter → Change, Change → Create (after clearing)
    fn default() -> Self {
        Self::empty()
            .with_step(PassCodeFlowType::Create, PassCodeFlowType::Enter, false)
            .with_step(PassCodeFlowType::Enter, PassCodeFlowType::Change, false)
            .with_step(PassCodeFlowType::Change, PassCodeFlowType::Create, true)
    }
}

impl FlowChain {
    /// Table with no successors
    pub fn empty() -> Self {
        Self {
            steps: HashMap::new(),
        }
    }

    pub fn with_step(
        mut self,
        from: PassCodeFlowType,
        next: PassCodeFlowType,
        clear_stored_code: bool,
    ) -> Self {
        self.steps.insert(
            from,
            ChainStep {
                next,
                clear_stored_code,
            },
        );
        self
    }

    pub fn next_step(&self, finished: &PassCodeFlowType) -> Option<&ChainStep> {
        self.steps.get(finished)
    }
}

/// Builds coordinators by flow type
pub trait CoordinatorFactory: Send + Sync {
    /// `None` for flows this factory does not know
    fn make(&self, flow: &PassCodeFlowType) -> Option<Box<dyn FlowCoordinator>>;
}

/// Factory for the built-in create, change and enter flows
pub struct StandardCoordinatorFactory {
    config: PasscodeConfig,
    storage: Arc<dyn PasscodeStorage>,
    biometrics: Arc<dyn BiometricsService>,
}

impl StandardCoordinatorFactory {
    pub fn new(
        config: &PasscodeConfig,
        storage: Arc<dyn PasscodeStorage>,
        biometrics: Arc<dyn BiometricsService>,
    ) -> Self {
        Self {
            config: config.clone(),
            storage,
            biometrics,
        }
    }
}

impl CoordinatorFactory for StandardCoordinatorFactory {
    fn make(&self, flow: &PassCodeFlowType) -> Option<Box<dyn FlowCoordinator>> {
        let titles = self.config.titles.clone();
        match flow {
            PassCodeFlowType::Create => Some(Box::new(
                CreateFlowCoordinator::new(self.storage.clone()).with_titles(titles),
            )),
            PassCodeFlowType::Change => Some(Box::new(
                ChangeFlowCoordinator::new(self.storage.clone(), self.config.max_attempts)
                    .with_titles(titles),
            )),
            PassCodeFlowType::Enter => Some(Box::new(
                EnterFlowCoordinator::new(
                    self.storage.clone(),
                    self.biometrics.clone(),
                    self.config.max_attempts,
                )
                .with_title(titles.enter_current)
                .with_parameters(self.config.biometrics.clone()),
            )),
            PassCodeFlowType::Custom(_) => None,
        }
    }
}

/// Moves a view-model along the hand-off table
pub struct FlowOrchestrator {
    chain: FlowChain,
    factory: Box<dyn CoordinatorFactory>,
}

impl FlowOrchestrator {
    pub fn new(chain: FlowChain, factory: impl CoordinatorFactory + 'static) -> Self {
        Self {
            chain,
            factory: Box::new(factory),
        }
    }

    /// Enter if a passcode is stored, otherwise Create
    pub fn initial_flow(
        storage: &dyn PasscodeStorage,
    ) -> std::result::Result<PassCodeFlowType, StorageError> {
        Ok(if storage.has_stored_code()? {
            PassCodeFlowType::Enter
        } else {
            PassCodeFlowType::Create
        })
    }

    /// Coordinator for `flow`, if the factory knows it
    pub fn coordinator_for(&self, flow: &PassCodeFlowType) -> Option<Box<dyn FlowCoordinator>> {
        self.factory.make(flow)
    }

    /// Start the successor of a successfully finished flow
    ///
    /// Returns the flow now running, or `None` when `state` is not a success
    /// or the finished flow has no successor.
    pub fn advance(
        &self,
        view_model: &mut PasscodeViewModel,
        state: &PassCodeState,
    ) -> Result<Option<PassCodeFlowType>> {
        let PassCodeState::Finished {
            error: None,
            flow_type,
        } = state
        else {
            return Ok(None);
        };

        let Some(step) = self.chain.next_step(flow_type) else {
            debug!("No flow follows {}", flow_type);
            return Ok(None);
        };

        let Some(coordinator) = self.factory.make(&step.next) else {
            warn!("No coordinator available for {} flow", step.next);
            return Ok(None);
        };

        if step.clear_stored_code {
            view_model.reset_stored_code()?;
        }

        info!("{} flow finished, continuing with {}", flow_type, step.next);
        view_model.update_coordinator(coordinator);
        view_model.start_flow();
        Ok(Some(step.next.clone()))
    }
}
