use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use atc_types::{HostStatus, IssuePacket, Mode, PushKind, PushMessage};

use crate::hub::Hub;

/// Upper bound on one collaborator fetch, so a hung collaborator cannot
/// stall the cadence.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Issue-tracker collaborator, opaque to the poller.
#[async_trait]
pub trait IssueFeed: Send + Sync {
    async fn fetch_issues(&self) -> anyhow::Result<Vec<IssuePacket>>;
}

/// Inference-host collaborator, opaque to the poller.
#[async_trait]
pub trait HostFeed: Send + Sync {
    async fn fetch_host_statuses(&self) -> anyhow::Result<Vec<HostStatus>>;
}

/// Produces one snapshot per cycle on a tunable cadence.
///
/// The interval is re-read at the top of every cycle; changes take effect
/// after the in-flight sleep finishes, never mid-sleep. A failed or
/// timed-out fetch degrades to empty data and the snapshot still publishes.
pub struct Poller<I, H> {
    hub: Arc<Hub>,
    issues: I,
    hosts: H,
}

impl<I, H> Poller<I, H>
where
    I: IssueFeed + 'static,
    H: HostFeed + 'static,
{
    pub fn new(hub: Arc<Hub>, issues: I, hosts: H) -> Self {
        Self { hub, issues, hosts }
    }

    /// Poll until the process exits. The first cycle runs immediately so
    /// early subscribers have a snapshot to replay.
    pub async fn run(self) {
        self.fetch_and_publish().await;
        loop {
            let secs = self.hub.interval_secs();
            tokio::time::sleep(Duration::from_secs(secs)).await;
            self.fetch_and_publish().await;
        }
    }

    /// One cycle of the mode-selected fetch: update the snapshot store and
    /// enqueue exactly one broadcast.
    pub async fn fetch_and_publish(&self) {
        let msg = match self.hub.mode() {
            Mode::Planning => {
                let issues = self.issues_or_empty().await;
                PushMessage::new(PushKind::Issues, json!(issues), Some(Mode::Planning))
            }
            Mode::Active => {
                let hosts = self.hosts_or_empty().await;
                PushMessage::new(PushKind::Hosts, json!(hosts), Some(Mode::Active))
            }
            Mode::Experiment => {
                let hosts = self.hosts_or_empty().await;
                let sessions = self.hub.sessions();
                PushMessage::new(
                    PushKind::ExperimentState,
                    json!({"sessions": sessions, "hosts": hosts}),
                    Some(Mode::Experiment),
                )
            }
        };
        self.hub.publish(msg);
    }

    async fn issues_or_empty(&self) -> Vec<IssuePacket> {
        match tokio::time::timeout(FETCH_TIMEOUT, self.issues.fetch_issues()).await {
            Ok(Ok(issues)) => issues,
            Ok(Err(err)) => {
                warn!(%err, "issue fetch failed; publishing empty snapshot");
                Vec::new()
            }
            Err(_) => {
                warn!("issue fetch timed out; publishing empty snapshot");
                Vec::new()
            }
        }
    }

    async fn hosts_or_empty(&self) -> Vec<HostStatus> {
        match tokio::time::timeout(FETCH_TIMEOUT, self.hosts.fetch_host_statuses()).await {
            Ok(Ok(hosts)) => hosts,
            Ok(Err(err)) => {
                warn!(%err, "host fetch failed; publishing empty snapshot");
                Vec::new()
            }
            Err(_) => {
                warn!("host fetch timed out; publishing empty snapshot");
                Vec::new()
            }
        }
    }
}
