use std::fmt;

use crate::interval::{MAX_POLL_INTERVAL_SECS, MIN_POLL_INTERVAL_SECS};

/// Result type for atc-hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the hub layer
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Requested poll interval outside the accepted bounds
    IntervalOutOfRange(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IntervalOutOfRange(secs) => write!(
                f,
                "poll interval {}s out of range ({}-{}s)",
                secs, MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS
            ),
        }
    }
}

impl std::error::Error for Error {}
