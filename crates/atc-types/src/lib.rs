mod envelope;
mod event;
mod host;
mod issue;
mod mode;
mod session;
mod util;

pub use envelope::{PushKind, PushMessage};
pub use event::{ExperimentEvent, ExperimentEventKind, FlatEvent};
pub use host::{HardwareSpec, HostStatus};
pub use issue::{IssuePacket, SYNOPSIS_MAX_CHARS, velocity_score};
pub use mode::Mode;
pub use session::{
    ExperimentIteration, ExperimentSession, ExperimentStep, IterationStatus, SessionStatus,
    StepStatus, ValidationResult, ValidationStatus,
};
pub use util::{default_now, truncate_chars};
