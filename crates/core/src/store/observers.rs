//! Store event fan-out
//!
//! Notifications are fire-and-forget: observers are called synchronously
//! while the store is not holding any of its locks, and a failing observer
//! cannot fail the store operation.

use std::sync::Arc;

use timetrail_domain::StoreEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Receives store notifications.
pub trait StoreObserver: Send + Sync {
    fn on_event(&self, event: &StoreEvent);
}

/// Registered observers, notified in registration order.
#[derive(Clone, Default)]
pub struct Observers {
    listeners: Vec<Arc<dyn StoreObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Arc<dyn StoreObserver>) {
        self.listeners.push(observer);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&self, event: &StoreEvent) {
        trace!(?event, listeners = self.listeners.len(), "store event");
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("listeners", &self.listeners.len()).finish()
    }
}

/// Observer that republishes events on a tokio broadcast channel, for
/// consumers living on other tasks.
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    sender: broadcast::Sender<StoreEvent>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl StoreObserver for BroadcastObserver {
    fn on_event(&self, event: &StoreEvent) {
        // No receivers is fine: nobody is listening right now.
        let _ = self.sender.send(event.clone());
    }
}
