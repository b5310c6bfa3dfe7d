//! Connection registry
//!
//! Process-wide owner of the broadcast transport. Initialized lazily and
//! exactly once; repeated initialization calls return the existing
//! instance, so hot reloads or racing requests never create a second
//! transport or timer.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

use crate::history::ReadingLog;
use crate::utils::time::current_timestamp;

use super::scheduler::TemperatureBroadcaster;
use super::session::{Subscriber, SubscriberSession};

/// Global registry instance (initialized once when the server starts)
static REGISTRY: OnceLock<Arc<ConnectionRegistry>> = OnceLock::new();

/// Registry of attached subscribers around the broadcast scheduler
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    broadcaster: TemperatureBroadcaster,
    history: Arc<ReadingLog>,
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        let history = Arc::new(ReadingLog::new());
        let broadcaster = TemperatureBroadcaster::new(Arc::clone(&history));
        Self::with_broadcaster(broadcaster, history)
    }

    /// Create a registry around a specific scheduler and reading log
    pub fn with_broadcaster(
        broadcaster: TemperatureBroadcaster,
        history: Arc<ReadingLog>,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                broadcaster,
                history,
                subscribers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Generate a new subscriber ID
    fn generate_subscriber_id() -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("sub_{:x}", timestamp)
    }

    /// Attach a new connection: registers demand with the scheduler and
    /// returns the session handle carrying the snapshot and receiver
    pub fn attach(&self) -> SubscriberSession {
        let id = Self::generate_subscriber_id();
        let (snapshot, events) = self.inner.broadcaster.subscribe();

        self.inner.subscribers.write().insert(
            id.clone(),
            Subscriber {
                id: id.clone(),
                connected_at: current_timestamp(),
            },
        );
        eprintln!(
            "[Broadcast] subscriber {} attached (demand {})",
            id,
            self.inner.broadcaster.demand()
        );

        SubscriberSession::new(id, snapshot, events, Arc::clone(&self.inner))
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Whether the broadcast timer is currently running
    pub fn is_streaming(&self) -> bool {
        self.inner.broadcaster.is_streaming()
    }

    /// One-off reading for the snapshot endpoint
    pub fn current_reading(&self) -> String {
        self.inner.broadcaster.current_reading()
    }

    /// Recent readings recorded by broadcast ticks
    pub fn history(&self) -> &ReadingLog {
        &self.inner.history
    }
}

impl RegistryInner {
    /// Detach a connection. Called by the session handle exactly once.
    pub(crate) fn release(&self, id: &str) {
        self.subscribers.write().remove(id);
        self.broadcaster.unsubscribe();
        eprintln!(
            "[Broadcast] subscriber {} detached (demand {})",
            id,
            self.broadcaster.demand()
        );
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the global registry (call once when the server starts).
/// Calling this again returns the existing instance.
pub fn init_registry() -> Arc<ConnectionRegistry> {
    REGISTRY
        .get_or_init(|| Arc::new(ConnectionRegistry::new()))
        .clone()
}

/// Get the global registry (returns None if not initialized)
pub fn get_registry() -> Option<Arc<ConnectionRegistry>> {
    REGISTRY.get().cloned()
}
