use std::collections::VecDeque;
use std::sync::RwLock;

/// Capacity of the flat-event ring.
pub const EVENT_RING_CAPACITY: usize = 50;

/// Capacity of the experiment-event ring.
pub const EXPERIMENT_RING_CAPACITY: usize = 100;

/// Bounded FIFO of recent events.
///
/// `append` evicts the oldest entry once capacity is exceeded; `snapshot`
/// returns an independent copy safe for concurrent readers. Both go through
/// the same lock, so they are linearizable with respect to each other.
#[derive(Debug)]
pub struct EventRing<T> {
    capacity: usize,
    inner: RwLock<VecDeque<T>>,
}

impl<T: Clone> EventRing<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn append(&self, item: T) {
        let mut ring = self.inner.write().unwrap();
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(item);
    }

    /// Owned copy of the ring contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.read().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_snapshot() {
        let ring = EventRing::new(3);
        ring.append(1);
        ring.append(2);
        assert_eq!(ring.snapshot(), vec![1, 2]);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let ring = EventRing::new(50);
        for i in 0..51 {
            ring.append(i);
        }
        let snapshot = ring.snapshot();
        assert_eq!(snapshot.len(), 50);
        // The 51st append evicts the 1st
        assert_eq!(snapshot[0], 1);
        assert_eq!(snapshot[49], 50);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let ring = EventRing::new(4);
        ring.append("a");
        let snapshot = ring.snapshot();
        ring.append("b");
        assert_eq!(snapshot, vec!["a"]);
    }
}
