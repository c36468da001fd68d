//! Events delivered to the view-model's own queue
//!
//! Everything asynchronous (biometric verdicts, host lifecycle changes) is
//! turned into a [`FlowEvent`] and only applied when the owning thread drains
//! the queue. Flow state is therefore never touched from another task.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::biometrics::{BiometricsOutcome, BiometricsParameters, BiometricsService};
use crate::error::BiometricsError;
use crate::lifecycle::LifecycleEvent;

/// Identity of one coordinator activation
///
/// `coordinator_id` changes when the view-model swaps coordinators and
/// `generation` changes when the flow is reset. A biometric verdict is only
/// applied if its ticket still matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowTicket {
    pub coordinator_id: u64,
    pub generation: u64,
}

impl FlowTicket {
    pub(crate) fn first() -> Self {
        Self {
            coordinator_id: 0,
            generation: 0,
        }
    }

    pub(crate) fn next_generation(self) -> Self {
        Self {
            generation: self.generation.wrapping_add(1),
            ..self
        }
    }

    pub(crate) fn next_coordinator(self) -> Self {
        Self {
            coordinator_id: self.coordinator_id.wrapping_add(1),
            generation: 0,
        }
    }
}

impl fmt::Display for FlowTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.coordinator_id, self.generation)
    }
}

/// Input to the view-model's event queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A biometric challenge finished
    Biometrics {
        ticket: FlowTicket,
        outcome: BiometricsOutcome,
    },
    /// The host application changed lifecycle state
    Lifecycle(LifecycleEvent),
}

/// What a coordinator needs to start asynchronous work
pub struct FlowContext {
    ticket: FlowTicket,
    events: mpsc::UnboundedSender<FlowEvent>,
}

impl FlowContext {
    pub(crate) fn new(ticket: FlowTicket, events: mpsc::UnboundedSender<FlowEvent>) -> Self {
        Self { ticket, events }
    }

    pub fn ticket(&self) -> FlowTicket {
        self.ticket
    }

    /// One-shot handle for delivering a biometric verdict
    pub fn biometrics_reply(&self) -> BiometricsReply {
        BiometricsReply {
            ticket: self.ticket,
            events: self.events.clone(),
        }
    }
}

/// Delivers exactly one biometric verdict back to the view-model
///
/// Consumed on use, so a challenge can never answer twice.
pub struct BiometricsReply {
    ticket: FlowTicket,
    events: mpsc::UnboundedSender<FlowEvent>,
}

impl BiometricsReply {
    pub fn ticket(&self) -> FlowTicket {
        self.ticket
    }

    /// Queue the verdict
    pub fn send(self, outcome: BiometricsOutcome) {
        let event = FlowEvent::Biometrics {
            ticket: self.ticket,
            outcome,
        };
        if self.events.send(event).is_err() {
            tracing::debug!("View-model dropped before biometric verdict {}", self.ticket);
        }
    }

    /// Run the challenge on the current tokio runtime and queue its verdict
    ///
    /// Without a runtime the challenge cannot run; a failure is queued instead
    /// so the caller still sees the result asynchronously.
    pub fn spawn(self, service: Arc<dyn BiometricsService>, parameters: BiometricsParameters) {
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let outcome = service.authenticate(&parameters).await;
                    self.send(outcome);
                });
            }
            Err(_) => {
                tracing::warn!("No async runtime available for biometric challenge");
                self.send(Err(BiometricsError::Unavailable));
            }
        }
    }
}
