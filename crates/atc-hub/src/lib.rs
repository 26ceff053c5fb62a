//! The hub: the in-process broker between headless producers and browser
//! subscribers.
//!
//! Five cooperating parts: the snapshot store (last poll result, replayed to
//! fresh subscribers), two bounded event rings, the session registry with
//! its event-driven state machine, the subscriber set owned by a single
//! control-loop task, and the poller that produces snapshots on a tunable
//! cadence.

mod control;
mod error;
mod hub;
mod interval;
mod payload;
mod poller;
mod registry;
mod ring;
mod snapshot;
mod subscriber;

pub use control::ControlHandle;
pub use error::{Error, Result};
pub use hub::Hub;
pub use interval::{
    DEFAULT_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS, MIN_POLL_INTERVAL_SECS, PollInterval,
};
pub use poller::{FETCH_TIMEOUT, HostFeed, IssueFeed, Poller};
pub use registry::SessionRegistry;
pub use ring::{EVENT_RING_CAPACITY, EXPERIMENT_RING_CAPACITY, EventRing};
pub use snapshot::SnapshotStore;
pub use subscriber::{SUBSCRIBER_QUEUE_DEPTH, Subscriber};
