//! Per-connection subscriber session

use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::StreamEvent;
use super::registry::RegistryInner;

/// Record of one attached subscriber, owned by the registry
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: String,
    pub connected_at: i64,
}

/// Handle for one attached connection.
///
/// Carries the snapshot captured at attach time and the live event
/// receiver. Detaches from the registry exactly once, through
/// [`detach`](Self::detach) or on drop, whichever comes first, so
/// transports that fire multiple teardown signals cannot double-release
/// the subscription.
pub struct SubscriberSession {
    id: String,
    snapshot: String,
    /// Receiver for values fanned out by the broadcast timer
    pub events: broadcast::Receiver<StreamEvent>,
    registry: Arc<RegistryInner>,
    detached: bool,
}

impl SubscriberSession {
    pub(crate) fn new(
        id: String,
        snapshot: String,
        events: broadcast::Receiver<StreamEvent>,
        registry: Arc<RegistryInner>,
    ) -> Self {
        Self {
            id,
            snapshot,
            events,
            registry,
            detached: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot value captured at attach time
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Detach from the registry now instead of waiting for drop
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.detached {
            self.detached = true;
            self.registry.release(&self.id);
        }
    }
}

impl Drop for SubscriberSession {
    fn drop(&mut self) {
        self.release();
    }
}
