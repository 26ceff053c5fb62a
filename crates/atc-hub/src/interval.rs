use std::sync::RwLock;

use crate::error::{Error, Result};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;
pub const MAX_POLL_INTERVAL_SECS: u64 = 300;

/// The current poll cadence in seconds, adjustable at runtime.
///
/// The poller re-reads it at the top of every cycle, so a change takes
/// effect on the next cycle and never mid-sleep.
#[derive(Debug)]
pub struct PollInterval {
    secs: RwLock<u64>,
}

impl Default for PollInterval {
    fn default() -> Self {
        Self {
            secs: RwLock::new(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl PollInterval {
    pub fn get(&self) -> u64 {
        *self.secs.read().unwrap()
    }

    pub fn set(&self, secs: u64) -> Result<()> {
        if !(MIN_POLL_INTERVAL_SECS..=MAX_POLL_INTERVAL_SECS).contains(&secs) {
            return Err(Error::IntervalOutOfRange(secs));
        }
        *self.secs.write().unwrap() = secs;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval() {
        assert_eq!(PollInterval::default().get(), 10);
    }

    #[test]
    fn test_bounds() {
        let interval = PollInterval::default();
        assert_eq!(interval.set(0), Err(Error::IntervalOutOfRange(0)));
        assert!(interval.set(1).is_ok());
        assert!(interval.set(300).is_ok());
        assert_eq!(interval.set(301), Err(Error::IntervalOutOfRange(301)));
        assert_eq!(interval.get(), 300);
    }

    #[test]
    fn test_set_current_value_is_noop() {
        let interval = PollInterval::default();
        interval.set(10).unwrap();
        assert_eq!(interval.get(), 10);
    }
}
