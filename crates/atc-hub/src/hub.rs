use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use atc_types::{ExperimentEvent, ExperimentSession, FlatEvent, Mode, PushKind, PushMessage};

use crate::control::ControlHandle;
use crate::interval::PollInterval;
use crate::registry::SessionRegistry;
use crate::ring::{EVENT_RING_CAPACITY, EXPERIMENT_RING_CAPACITY, EventRing};
use crate::snapshot::SnapshotStore;
use crate::subscriber::Subscriber;

/// The in-process broker that owns subscribers, snapshot, rings, and
/// sessions.
///
/// Producers (ingress handlers, the poller) deposit state changes; the
/// control loop fans every change out to subscribed connections with
/// per-subscriber isolation.
pub struct Hub {
    mode: Mode,
    snapshot: SnapshotStore,
    flat_ring: EventRing<FlatEvent>,
    experiment_ring: EventRing<ExperimentEvent>,
    registry: SessionRegistry,
    interval: PollInterval,
    control: ControlHandle,
}

impl Hub {
    /// Build the hub and spawn its control loop on the current runtime.
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            snapshot: SnapshotStore::new(),
            flat_ring: EventRing::new(EVENT_RING_CAPACITY),
            experiment_ring: EventRing::new(EXPERIMENT_RING_CAPACITY),
            registry: SessionRegistry::new(),
            interval: PollInterval::default(),
            control: ControlHandle::spawn(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // ---- Subscribers -----------------------------------------------------

    /// Register a new push connection.
    ///
    /// The snapshot frame and the flat-ring replay are enqueued before the
    /// subscriber joins the broadcast set, so they always precede any live
    /// frame on the wire. A replayed event may still be echoed by an
    /// interleaved broadcast; subscribers tolerate that.
    pub fn subscribe(&self) -> (Uuid, mpsc::Receiver<String>) {
        let (subscriber, rx) = Subscriber::channel();
        let id = subscriber.id();

        if let Some(snapshot) = self.snapshot.get()
            && let Ok(frame) = serde_json::to_string(&snapshot)
        {
            subscriber.enqueue(&frame);
        }

        let replay = PushMessage::new(PushKind::Events, json!(self.flat_ring.snapshot()), None);
        if let Ok(frame) = serde_json::to_string(&replay) {
            subscriber.enqueue(&frame);
        }

        self.control.register(subscriber);
        (id, rx)
    }

    pub fn unsubscribe(&self, id: Uuid) {
        self.control.unregister(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.control.subscriber_count()
    }

    // ---- Producers -------------------------------------------------------

    /// Poller path: replace the snapshot and broadcast, atomically enough
    /// that a subscriber connecting at any instant sees this cycle's message
    /// or a later one.
    pub fn publish(&self, msg: PushMessage) {
        self.snapshot.put(msg.clone());
        self.control.broadcast(msg);
    }

    /// Ingress path for flat events. The producer-supplied timestamp is
    /// overwritten; that trust boundary has no opt-out.
    pub fn ingest_flat(&self, mut event: FlatEvent) {
        event.time = Utc::now();
        self.flat_ring.append(event.clone());
        self.control
            .broadcast(PushMessage::new(PushKind::Event, json!(event), Some(self.mode)));
    }

    /// Ingress path for experiment events: apply to the registry, ring, and
    /// broadcast. A dropped mutation still rings and broadcasts.
    pub fn ingest_experiment(&self, mut event: ExperimentEvent) {
        event.time = Utc::now();
        self.registry.apply(&event);
        self.experiment_ring.append(event.clone());
        self.control.broadcast(PushMessage::new(
            PushKind::Experiment,
            json!(event),
            Some(self.mode),
        ));
    }

    // ---- Observers -------------------------------------------------------

    pub fn last_snapshot(&self) -> Option<PushMessage> {
        self.snapshot.get()
    }

    pub fn flat_events(&self) -> Vec<FlatEvent> {
        self.flat_ring.snapshot()
    }

    pub fn experiment_events(&self) -> Vec<ExperimentEvent> {
        self.experiment_ring.snapshot()
    }

    pub fn sessions(&self) -> Vec<ExperimentSession> {
        self.registry.list()
    }

    pub fn session(&self, id: &str) -> Option<ExperimentSession> {
        self.registry.get(id)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval.get()
    }

    pub fn set_interval_secs(&self, secs: u64) -> crate::Result<()> {
        self.interval.set(secs)
    }
}
