use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::debug;

use atc_hub::HostFeed;
use atc_types::{HardwareSpec, HostStatus};

use crate::error::{Error, Result};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide hardware table, keyed by host name. Hosts absent from the
/// table get a blank descriptor; the probe never discovers hardware.
static HARDWARE: Lazy<HashMap<&'static str, HardwareSpec>> = Lazy::new(|| {
    HashMap::from([
        (
            "titan",
            HardwareSpec::new("Ryzen 9 7950X", "RTX 4090 24GB", "64GB DDR5"),
        ),
        (
            "scout",
            HardwareSpec::new("Apple M2 Ultra", "76-core GPU", "192GB unified"),
        ),
        (
            "relay",
            HardwareSpec::new("Xeon W-2295", "2x RTX 3090 24GB", "128GB DDR4"),
        ),
    ])
});

pub fn hardware_for(name: &str) -> HardwareSpec {
    HARDWARE.get(name).cloned().unwrap_or_default()
}

/// One probe target: a named inference host serving an Ollama-style API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub name: String,
    pub url: String,
}

impl HostTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Wire shape of the model inventory endpoint (`GET /api/tags`).
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

/// Probes the host roster concurrently and reports liveness, latency, and
/// model inventory. A host that fails or times out is reported offline; the
/// probe itself only errors on configuration problems.
pub struct HostProbe {
    client: reqwest::Client,
    roster: Vec<HostTarget>,
}

impl HostProbe {
    pub fn new(roster: Vec<HostTarget>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, roster }
    }

    /// Built-in roster, overridable via `ATC_HOSTS` (`name=url,name=url`).
    pub fn from_env() -> Result<Self> {
        let roster = match std::env::var("ATC_HOSTS") {
            Ok(value) => parse_roster(&value)?,
            Err(_) => default_roster(),
        };
        Ok(Self::new(roster))
    }

    pub fn roster(&self) -> &[HostTarget] {
        &self.roster
    }

    pub async fn fetch(&self) -> Vec<HostStatus> {
        let probes = self.roster.iter().map(|target| self.probe_one(target));
        futures::future::join_all(probes).await
    }

    async fn probe_one(&self, target: &HostTarget) -> HostStatus {
        let checked_at = Utc::now();
        let hardware = hardware_for(&target.name);
        let url = format!("{}/api/tags", target.url.trim_end_matches('/'));

        let started = Instant::now();
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(host = %target.name, status = %r.status(), "host probe rejected");
                return HostStatus::offline(
                    target.name.as_str(),
                    target.url.as_str(),
                    checked_at,
                    hardware,
                );
            }
            Err(err) => {
                debug!(host = %target.name, %err, "host probe failed");
                return HostStatus::offline(
                    target.name.as_str(),
                    target.url.as_str(),
                    checked_at,
                    hardware,
                );
            }
        };

        let latency_ms = started.elapsed().as_millis() as u64;
        let models = match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
            Err(err) => {
                debug!(host = %target.name, %err, "host inventory unreadable");
                return HostStatus::offline(
                    target.name.as_str(),
                    target.url.as_str(),
                    checked_at,
                    hardware,
                );
            }
        };

        HostStatus {
            name: target.name.clone(),
            url: target.url.clone(),
            online: true,
            latency_ms,
            models,
            checked_at,
            hardware,
        }
    }
}

fn default_roster() -> Vec<HostTarget> {
    vec![
        HostTarget::new("titan", "http://titan.local:11434"),
        HostTarget::new("scout", "http://scout.local:11434"),
        HostTarget::new("relay", "http://relay.local:11434"),
    ]
}

fn parse_roster(raw: &str) -> Result<Vec<HostTarget>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, url) = entry
                .split_once('=')
                .ok_or_else(|| Error::Roster(format!("expected name=url, got '{entry}'")))?;
            if name.is_empty() || url.is_empty() {
                return Err(Error::Roster(format!("expected name=url, got '{entry}'")));
            }
            Ok(HostTarget::new(name, url))
        })
        .collect()
}

#[async_trait]
impl HostFeed for HostProbe {
    async fn fetch_host_statuses(&self) -> anyhow::Result<Vec<HostStatus>> {
        Ok(self.fetch().await)
    }
}
