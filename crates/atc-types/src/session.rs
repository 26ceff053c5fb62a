use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// 1. Session (the mutable aggregate root)
// ==========================================

/// One experiment run, assembled from producer-posted lifecycle events.
///
/// Created on `session_start`, mutated by step/iteration/validation events,
/// frozen on `session_complete`/`session_fail`, and retained in memory for
/// the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSession {
    /// Producer-supplied identifier; duplicate starts replace the entry.
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub status: SessionStatus,
    /// Number of the most recently started step, 0 before any step.
    pub current_step: u32,
    pub total_steps: u32,
    /// Steps in the order they were started; numbers strictly increase.
    pub steps: Vec<ExperimentStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

// ==========================================
// 2. Step
// ==========================================

/// One phase of an experiment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentStep {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Iterations in append order; terminal iteration events always address
    /// the last one.
    pub iterations: Vec<ExperimentIteration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

// ==========================================
// 3. Iteration
// ==========================================

/// One model invocation within a step.
///
/// The numeric fields are producer-supplied; the hub copies them verbatim
/// and never computes derived rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentIteration {
    pub number: u32,
    pub model: String,
    pub host: String,
    pub status: IterationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub duration_sec: f64,
    pub tokens: u64,
    pub tokens_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationStatus {
    Running,
    Completed,
    Failed,
}

// ==========================================
// Validation
// ==========================================

/// Outcome of a step's validation command; at most one per step,
/// last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub command: String,
    pub status: ValidationStatus,
    pub output: String,
    pub errors: Vec<String>,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Skip,
}

impl ExperimentSession {
    /// Locate a step by its producer-supplied id.
    pub fn step_mut(&mut self, step_id: &str) -> Option<&mut ExperimentStep> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }
}
