//! Scripted fake collaborators implementing the hub's feed traits.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use atc_hub::{HostFeed, IssueFeed};
use atc_types::{HardwareSpec, HostStatus, IssuePacket};

/// A throwaway issue packet with just enough shape for ordering assertions.
pub fn issue(number: u64, velocity: i64) -> IssuePacket {
    IssuePacket {
        id: number,
        number,
        title: format!("issue #{number}"),
        state: "open".to_string(),
        labels: Vec::new(),
        assignee: None,
        epic: None,
        is_pr: false,
        updated_at: Utc::now(),
        synopsis: String::new(),
        velocity,
    }
}

/// A host status fixture for an online host.
pub fn host(name: &str, models: &[&str]) -> HostStatus {
    HostStatus {
        name: name.to_string(),
        url: format!("http://{name}.test:11434"),
        online: true,
        latency_ms: 12,
        models: models.iter().map(|m| m.to_string()).collect(),
        checked_at: Utc::now(),
        hardware: HardwareSpec::default(),
    }
}

/// Issue feed that pops one scripted batch per fetch, then serves empty.
pub struct ScriptedIssues {
    batches: Mutex<VecDeque<anyhow::Result<Vec<IssuePacket>>>>,
}

impl ScriptedIssues {
    pub fn new(batches: Vec<anyhow::Result<Vec<IssuePacket>>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl IssueFeed for ScriptedIssues {
    async fn fetch_issues(&self) -> anyhow::Result<Vec<IssuePacket>> {
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Host feed that always returns the same roster.
pub struct StaticHosts(pub Vec<HostStatus>);

#[async_trait]
impl HostFeed for StaticHosts {
    async fn fetch_host_statuses(&self) -> anyhow::Result<Vec<HostStatus>> {
        Ok(self.0.clone())
    }
}

/// Host feed whose probe always errors, for collaborator-failure paths.
pub struct FailingHosts;

#[async_trait]
impl HostFeed for FailingHosts {
    async fn fetch_host_statuses(&self) -> anyhow::Result<Vec<HostStatus>> {
        Err(anyhow!("probe offline"))
    }
}
