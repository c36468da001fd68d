//! Host lifecycle hooks
//!
//! The host owns a [`LifecycleHub`] and calls [`LifecycleHub::notify`] when the
//! app moves to the background or foreground. View-models subscribe through
//! [`crate::PasscodeViewModel::bind_lifecycle`]; the returned subscription is
//! removed from the hub when the view-model is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use crate::events::FlowEvent;

/// Application lifecycle transitions relevant to a passcode screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The app was sent to the background
    DidEnterBackground,
    /// The app is about to return to the foreground
    WillEnterForeground,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<FlowEvent>)>,
}

/// Fans lifecycle events out to subscribed view-models
#[derive(Clone, Default)]
pub struct LifecycleHub {
    inner: Arc<Mutex<HubInner>>,
}

impl LifecycleHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
        inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a queue; events stop when the subscription is dropped
    pub fn subscribe(&self, sender: mpsc::UnboundedSender<FlowEvent>) -> LifecycleSubscription {
        let mut inner = Self::lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, sender));

        LifecycleSubscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every live subscriber, returning how many received it
    pub fn notify(&self, event: LifecycleEvent) -> usize {
        let mut inner = Self::lock(&self.inner);
        inner
            .subscribers
            .retain(|(_, sender)| sender.send(FlowEvent::Lifecycle(event)).is_ok());

        tracing::debug!(
            "Lifecycle {:?} delivered to {} subscriber(s)",
            event,
            inner.subscribers.len()
        );
        inner.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        Self::lock(&self.inner).subscribers.len()
    }
}

/// Registration in a [`LifecycleHub`]; unsubscribes on drop
pub struct LifecycleSubscription {
    id: u64,
    hub: Weak<Mutex<HubInner>>,
}

impl Drop for LifecycleSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            LifecycleHub::lock(&inner)
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}
