use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Mode;
use crate::util::default_now;

/// Tag of a server-to-client push frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushKind {
    /// Poll result: ranked issue packets.
    Issues,
    /// Poll result: host statuses.
    Hosts,
    /// Poll result: sessions plus host statuses.
    ExperimentState,
    /// Flat-ring replay sent to a fresh subscriber.
    Events,
    /// One relayed flat event.
    Event,
    /// One relayed experiment event.
    Experiment,
}

/// The push envelope: one JSON value per WebSocket frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind: PushKind,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default = "default_now")]
    pub time: DateTime<Utc>,
}

impl PushMessage {
    pub fn new(kind: PushKind, data: Value, mode: Option<Mode>) -> Self {
        Self {
            kind,
            data,
            mode,
            time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let msg = PushMessage::new(PushKind::Issues, json!([{"number": 7}]), Some(Mode::Planning));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "issues");
        assert_eq!(value["mode"], "planning");
        assert_eq!(value["data"][0]["number"], 7);
        assert!(value.get("time").is_some());
    }

    #[test]
    fn test_envelope_mode_absent_when_none() {
        let msg = PushMessage::new(PushKind::Events, json!([]), None);
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("mode").is_none());
    }
}
