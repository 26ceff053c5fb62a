use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::default_now;

/// An event not associated with any session: a simple type/data/time tuple.
///
/// Producers send `start`, `progress`, `complete`, `analysis`, or `event`;
/// unrecognized tags are carried through untouched since the hub never
/// branches on the flat kind. The timestamp is stamped by the hub on
/// ingress, overwriting whatever the producer supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_now")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub data: Value,
}

/// Type tag of an experiment event.
///
/// The closed variants drive the session state machine; anything else lands
/// in `Other` and still rides the ring and broadcast, it just never mutates
/// the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentEventKind {
    SessionStart,
    SessionComplete,
    SessionFail,
    StepStart,
    StepComplete,
    StepFail,
    IterationStart,
    IterationComplete,
    IterationFail,
    Validation,
    #[serde(untagged)]
    Other(String),
}

/// An event addressed to an experiment session (and optionally a step).
///
/// The `data` field is effectively untyped; the registry reads it through a
/// narrow accessor layer. The timestamp is hub-stamped on ingress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentEvent {
    #[serde(rename = "type")]
    pub kind: ExperimentEventKind,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(default = "default_now")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub data: Value,
}
