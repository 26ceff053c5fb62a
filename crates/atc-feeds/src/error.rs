use std::fmt;

/// Result type for atc-feeds operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the feeds layer
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure talking to a collaborator
    Http(reqwest::Error),

    /// Collaborator answered with a non-success status
    Status(u16, String),

    /// Malformed roster configuration (e.g. ATC_HOSTS)
    Roster(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status(code, url) => write!(f, "unexpected status {} from {}", code, url),
            Error::Roster(msg) => write!(f, "invalid host roster: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Status(_, _) | Error::Roster(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
