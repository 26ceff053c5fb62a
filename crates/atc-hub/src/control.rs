use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use atc_types::PushMessage;

use crate::subscriber::{Subscriber, SubscriberSet};

const REGISTER_QUEUE_DEPTH: usize = 32;
const BROADCAST_QUEUE_DEPTH: usize = 256;

/// Handle onto the control loop's three queues.
///
/// The loop task is the sole owner of the subscriber set; register,
/// unregister, and broadcast all enqueue and return immediately, so no
/// producer ever blocks on a subscriber.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    register_tx: mpsc::Sender<Subscriber>,
    unregister_tx: mpsc::Sender<Uuid>,
    broadcast_tx: mpsc::Sender<PushMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl ControlHandle {
    /// Spawn the control loop on the current runtime.
    pub fn spawn() -> Self {
        let (register_tx, register_rx) = mpsc::channel(REGISTER_QUEUE_DEPTH);
        let (unregister_tx, unregister_rx) = mpsc::channel(REGISTER_QUEUE_DEPTH);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(BROADCAST_QUEUE_DEPTH);
        let subscriber_count = Arc::new(AtomicUsize::new(0));

        tokio::spawn(control_loop(
            register_rx,
            unregister_rx,
            broadcast_rx,
            Arc::clone(&subscriber_count),
        ));

        Self {
            register_tx,
            unregister_tx,
            broadcast_tx,
            subscriber_count,
        }
    }

    pub fn register(&self, subscriber: Subscriber) {
        if self.register_tx.try_send(subscriber).is_err() {
            warn!("register queue full; dropping subscriber");
        }
    }

    pub fn unregister(&self, id: Uuid) {
        if self.unregister_tx.try_send(id).is_err() {
            warn!(subscriber = %id, "unregister queue full");
        }
    }

    /// Enqueue one broadcast. A full queue drops the message: there is no
    /// back-pressure toward producers and dropped messages are not replayed.
    pub fn broadcast(&self, msg: PushMessage) {
        if self.broadcast_tx.try_send(msg).is_err() {
            warn!("broadcast queue full; dropping message");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::Relaxed)
    }
}

async fn control_loop(
    mut register_rx: mpsc::Receiver<Subscriber>,
    mut unregister_rx: mpsc::Receiver<Uuid>,
    mut broadcast_rx: mpsc::Receiver<PushMessage>,
    subscriber_count: Arc<AtomicUsize>,
) {
    let mut set = SubscriberSet::default();

    loop {
        tokio::select! {
            Some(subscriber) = register_rx.recv() => {
                set.insert(subscriber);
            }
            Some(id) = unregister_rx.recv() => {
                set.remove(&id);
            }
            Some(msg) = broadcast_rx.recv() => {
                match serde_json::to_string(&msg) {
                    Ok(frame) => set.broadcast(&frame),
                    Err(err) => warn!(%err, "unserializable broadcast dropped"),
                }
            }
            else => break,
        }
        subscriber_count.store(set.len(), Ordering::Relaxed);
    }
}
