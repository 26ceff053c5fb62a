use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Depth of each subscriber's outgoing frame queue. A subscriber that falls
/// this far behind is evicted rather than allowed to stall producers.
pub const SUBSCRIBER_QUEUE_DEPTH: usize = 64;

/// Sending half of one long-lived push connection.
///
/// The receiving half is drained by the connection's writer task; the hub
/// side only ever enqueues, never awaits a peer write.
#[derive(Debug)]
pub struct Subscriber {
    id: Uuid,
    tx: mpsc::Sender<String>,
}

impl Subscriber {
    /// Create a subscriber and the queue its writer task will drain.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_DEPTH);
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Enqueue one frame without blocking. `false` means the queue is full
    /// or the connection is gone; the caller evicts.
    pub fn enqueue(&self, frame: &str) -> bool {
        self.tx.try_send(frame.to_string()).is_ok()
    }
}

/// The active subscriber set. Owned exclusively by the control loop; all
/// mutation arrives through its queues.
#[derive(Debug, Default)]
pub(crate) struct SubscriberSet {
    inner: HashMap<Uuid, Subscriber>,
}

impl SubscriberSet {
    pub(crate) fn insert(&mut self, subscriber: Subscriber) {
        self.inner.insert(subscriber.id(), subscriber);
    }

    pub(crate) fn remove(&mut self, id: &Uuid) {
        self.inner.remove(id);
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    /// Deliver one frame to every subscriber, evicting any whose queue
    /// rejects it. Failure of one never affects delivery to the rest.
    pub(crate) fn broadcast(&mut self, frame: &str) {
        self.inner.retain(|id, subscriber| {
            let ok = subscriber.enqueue(frame);
            if !ok {
                debug!(subscriber = %id, "evicting subscriber with stalled queue");
            }
            ok
        });
    }
}
