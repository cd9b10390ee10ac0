//! Broadcast hub for connected observers.
//!
//! The hub is the sole owner of the observer set. Each observer is a
//! bounded channel; the connection task on the other end forwards messages
//! to the client. Delivery is fire-and-forget: a slow observer drops
//! messages without blocking anyone, a disconnected observer is pruned on
//! the first failed delivery.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Per-observer queue depth. A client that falls this far behind starts
/// losing intermediate status lines, which is fine: only the newest state
/// matters.
const OBSERVER_QUEUE_DEPTH: usize = 8;

pub struct BroadcastHub {
    observers: DashMap<Uuid, mpsc::Sender<String>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            observers: DashMap::new(),
        }
    }

    /// Add an observer, returning its id and the receiving end of its queue.
    pub fn register(&self) -> (Uuid, mpsc::Receiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(OBSERVER_QUEUE_DEPTH);
        self.observers.insert(id, tx);
        debug!(observer = %id, observers = self.len(), "observer registered");
        (id, rx)
    }

    /// Remove an observer. A no-op if it is already gone.
    pub fn remove(&self, id: Uuid) {
        if self.observers.remove(&id).is_some() {
            debug!(observer = %id, observers = self.len(), "observer removed");
        }
    }

    /// Deliver `text` to every observer.
    ///
    /// Observers whose channel has closed are pruned. Observers whose queue
    /// is full miss this message but stay registered.
    pub fn broadcast(&self, text: &str) {
        let mut stale = Vec::new();

        for entry in self.observers.iter() {
            match entry.value().try_send(text.to_string()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(observer = %entry.key(), "observer lagging, message dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    stale.push(*entry.key());
                }
            }
        }

        for id in stale {
            self.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
