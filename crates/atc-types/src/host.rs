use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static hardware descriptor for an inference host.
///
/// Looked up by host name from a process-wide table; the probe never
/// discovers hardware at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub cpu: String,
    pub gpu: String,
    pub memory: String,
}

impl HardwareSpec {
    pub fn new(cpu: impl Into<String>, gpu: impl Into<String>, memory: impl Into<String>) -> Self {
        Self {
            cpu: cpu.into(),
            gpu: gpu.into(),
            memory: memory.into(),
        }
    }
}

/// Liveness and model inventory of one inference host at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostStatus {
    pub name: String,
    pub url: String,
    pub online: bool,
    pub latency_ms: u64,
    /// Model names reported by the host, in inventory order.
    pub models: Vec<String>,
    pub checked_at: DateTime<Utc>,
    pub hardware: HardwareSpec,
}

impl HostStatus {
    /// An offline placeholder for a host that could not be reached.
    pub fn offline(
        name: impl Into<String>,
        url: impl Into<String>,
        checked_at: DateTime<Utc>,
        hardware: HardwareSpec,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            online: false,
            latency_ms: 0,
            models: Vec::new(),
            checked_at,
            hardware,
        }
    }
}
