use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum synopsis length in characters.
pub const SYNOPSIS_MAX_CHARS: usize = 200;

/// One issue-tracker item, ranked by a synthetic velocity score.
///
/// Immutable after construction: the fetch layer builds the packet in one
/// shot (epic extraction, synopsis truncation, velocity) and the hub only
/// ever forwards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePacket {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    /// Label names in tracker order.
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Epic name extracted from the first `epic:`-prefixed label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    pub is_pr: bool,
    pub updated_at: DateTime<Utc>,
    /// Body truncated to [`SYNOPSIS_MAX_CHARS`] characters.
    pub synopsis: String,
    pub velocity: i64,
}

impl IssuePacket {
    /// Extract the epic name from a label list (`epic:infra` -> `infra`).
    pub fn epic_from_labels(labels: &[String]) -> Option<String> {
        labels
            .iter()
            .find_map(|l| l.strip_prefix("epic:"))
            .map(|name| name.trim().to_string())
    }
}

/// Compute the velocity score for an issue.
///
/// Pure: the same inputs always produce the same score. `now` is passed in
/// so callers score a whole fetch batch against one instant.
///
/// Rubric: +100 if updated within the last hour, else +50 within the last
/// day; per-label weights (P0/critical/urgent 500, P1/high 300, P2/medium
/// 100, epic 200, bug 50, enhancement/feature 25); +10 per comment.
pub fn velocity_score(
    now: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    labels: &[String],
    comments: u64,
) -> i64 {
    let mut score = 0i64;

    let age = now - updated_at;
    if age <= Duration::hours(1) {
        score += 100;
    } else if age <= Duration::days(1) {
        score += 50;
    }

    for label in labels {
        score += label_weight(label);
    }

    score + comments as i64 * 10
}

fn label_weight(label: &str) -> i64 {
    if label == "epic" || label.starts_with("epic:") {
        return 200;
    }
    match label {
        "P0" | "critical" | "urgent" => 500,
        "P1" | "high" => 300,
        "P2" | "medium" => 100,
        "bug" => 50,
        "enhancement" | "feature" => 25,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_velocity_recency_tiers() {
        let now = at(12, 0);
        assert_eq!(velocity_score(now, at(11, 30), &[], 0), 100);
        assert_eq!(velocity_score(now, at(10, 0), &[], 0), 50);
        assert_eq!(
            velocity_score(now, now - Duration::days(3), &[], 0),
            0
        );
    }

    #[test]
    fn test_velocity_label_weights() {
        let now = at(12, 0);
        let stale = now - Duration::days(3);
        let labels = vec!["P0".to_string(), "bug".to_string()];
        assert_eq!(velocity_score(now, stale, &labels, 0), 550);

        let labels = vec!["epic:serving".to_string(), "feature".to_string()];
        assert_eq!(velocity_score(now, stale, &labels, 0), 225);
    }

    #[test]
    fn test_velocity_comments() {
        let now = at(12, 0);
        assert_eq!(velocity_score(now, now - Duration::days(3), &[], 7), 70);
    }

    #[test]
    fn test_velocity_ordering_scenario() {
        // Issues: (#1, 30min ago, [P1]), (#2, 2h ago, [bug]), (#3, 30min ago, [P0])
        let now = at(12, 0);
        let v1 = velocity_score(now, at(11, 30), &["P1".to_string()], 0);
        let v2 = velocity_score(now, at(10, 0), &["bug".to_string()], 0);
        let v3 = velocity_score(now, at(11, 30), &["P0".to_string()], 0);
        assert_eq!(v3, 600);
        assert_eq!(v1, 400);
        assert_eq!(v2, 100);
        assert!(v3 > v1 && v1 > v2);
    }

    #[test]
    fn test_velocity_is_pure() {
        let now = at(12, 0);
        let labels = vec!["P2".to_string(), "enhancement".to_string()];
        let a = velocity_score(now, at(11, 45), &labels, 3);
        let b = velocity_score(now, at(11, 45), &labels, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_epic_extraction() {
        let labels = vec!["bug".to_string(), "epic:inference".to_string()];
        assert_eq!(
            IssuePacket::epic_from_labels(&labels),
            Some("inference".to_string())
        );
        assert_eq!(IssuePacket::epic_from_labels(&["bug".to_string()]), None);
    }
}
