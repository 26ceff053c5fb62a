use std::sync::RwLock;

use atc_types::PushMessage;

/// Holds the most recent poller output so a freshly connected subscriber
/// receives it immediately instead of waiting up to one poll interval.
///
/// One writer (the poller), many readers. Readers observe either the prior
/// value or the new one, never a tear; the lock is held only for the
/// replace/clone.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    inner: RwLock<Option<PushMessage>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot atomically.
    pub fn put(&self, msg: PushMessage) {
        *self.inner.write().unwrap() = Some(msg);
    }

    /// Observe the current snapshot, if any poll has completed yet.
    pub fn get(&self) -> Option<PushMessage> {
        self.inner.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atc_types::{Mode, PushKind};
    use serde_json::json;

    #[test]
    fn test_empty_until_first_put() {
        let store = SnapshotStore::new();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_put_replaces() {
        let store = SnapshotStore::new();
        store.put(PushMessage::new(
            PushKind::Issues,
            json!([1]),
            Some(Mode::Planning),
        ));
        store.put(PushMessage::new(
            PushKind::Issues,
            json!([2]),
            Some(Mode::Planning),
        ));

        let snapshot = store.get().unwrap();
        assert_eq!(snapshot.data, json!([2]));
    }
}
