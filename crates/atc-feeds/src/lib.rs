//! External collaborators consumed by the hub's poller: the issue tracker
//! and the inference-host fleet. Each feed owns its wire schema and maps it
//! into the tower's types; the hub never sees raw payloads.

mod error;
mod hosts;
mod issues;

pub use error::{Error, Result};
pub use hosts::{HostProbe, HostTarget, hardware_for};
pub use issues::IssueTracker;
