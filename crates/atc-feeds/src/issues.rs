use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use atc_hub::IssueFeed;
use atc_types::{IssuePacket, SYNOPSIS_MAX_CHARS, truncate_chars, velocity_score};

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("atctower/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Issue-tracker client for one repository.
///
/// Fetches open items, maps them into ranked [`IssuePacket`]s, and sorts by
/// velocity descending. Ties keep tracker order (stable sort).
pub struct IssueTracker {
    client: reqwest::Client,
    owner: String,
    repo: String,
    token: Option<String>,
}

/// Wire shape of a tracker item; only the fields the packet needs.
#[derive(Debug, Deserialize)]
struct RawIssue {
    id: u64,
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    assignee: Option<RawUser>,
    #[serde(default)]
    comments: u64,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

impl IssueTracker {
    /// `token` is optional; unauthenticated requests work at a lower rate
    /// limit.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            token,
        }
    }

    pub async fn fetch(&self) -> Result<Vec<IssuePacket>> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/issues?state=open&per_page=100",
            self.owner, self.repo
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16(), url));
        }

        let raw: Vec<RawIssue> = response.json().await?;
        let now = Utc::now();
        let mut packets: Vec<IssuePacket> = raw
            .into_iter()
            .map(|issue| into_packet(issue, now))
            .collect();
        packets.sort_by(|a, b| b.velocity.cmp(&a.velocity));
        Ok(packets)
    }
}

fn into_packet(raw: RawIssue, now: DateTime<Utc>) -> IssuePacket {
    let labels: Vec<String> = raw.labels.into_iter().map(|l| l.name).collect();
    let velocity = velocity_score(now, raw.updated_at, &labels, raw.comments);
    let epic = IssuePacket::epic_from_labels(&labels);
    let synopsis = truncate_chars(raw.body.as_deref().unwrap_or(""), SYNOPSIS_MAX_CHARS);

    IssuePacket {
        id: raw.id,
        number: raw.number,
        title: raw.title,
        state: raw.state,
        labels,
        assignee: raw.assignee.map(|u| u.login),
        epic,
        is_pr: raw.pull_request.is_some(),
        updated_at: raw.updated_at,
        synopsis,
        velocity,
    }
}

#[async_trait]
impl IssueFeed for IssueTracker {
    async fn fetch_issues(&self) -> anyhow::Result<Vec<IssuePacket>> {
        Ok(self.fetch().await?)
    }
}
