//! Builders for the experiment event vocabulary, shaped exactly like the
//! JSON bodies producers POST to `/experiment` and `/events`.

use chrono::Utc;
use serde_json::{Value, json};

use atc_types::{ExperimentEvent, ExperimentEventKind, FlatEvent};

fn event(
    kind: ExperimentEventKind,
    session_id: &str,
    step_id: Option<&str>,
    data: Value,
) -> ExperimentEvent {
    ExperimentEvent {
        kind,
        session_id: session_id.to_string(),
        step_id: step_id.map(str::to_string),
        time: Utc::now(),
        data,
    }
}

pub fn session_start(session_id: &str, name: &str, total_steps: u32) -> ExperimentEvent {
    event(
        ExperimentEventKind::SessionStart,
        session_id,
        None,
        json!({"name": name, "total_steps": total_steps}),
    )
}

pub fn session_complete(session_id: &str) -> ExperimentEvent {
    event(ExperimentEventKind::SessionComplete, session_id, None, Value::Null)
}

pub fn session_fail(session_id: &str) -> ExperimentEvent {
    event(ExperimentEventKind::SessionFail, session_id, None, Value::Null)
}

pub fn step_start(session_id: &str, step_id: &str, number: u32, name: &str) -> ExperimentEvent {
    event(
        ExperimentEventKind::StepStart,
        session_id,
        Some(step_id),
        json!({"number": number, "name": name}),
    )
}

pub fn step_complete(session_id: &str, step_id: &str) -> ExperimentEvent {
    event(ExperimentEventKind::StepComplete, session_id, Some(step_id), Value::Null)
}

pub fn step_fail(session_id: &str, step_id: &str) -> ExperimentEvent {
    event(ExperimentEventKind::StepFail, session_id, Some(step_id), Value::Null)
}

pub fn iteration_start(
    session_id: &str,
    step_id: &str,
    number: u32,
    model: &str,
    host: &str,
) -> ExperimentEvent {
    event(
        ExperimentEventKind::IterationStart,
        session_id,
        Some(step_id),
        json!({"number": number, "model": model, "host": host}),
    )
}

pub fn iteration_complete(
    session_id: &str,
    step_id: &str,
    duration_sec: f64,
    tokens: u64,
    tokens_sec: f64,
) -> ExperimentEvent {
    event(
        ExperimentEventKind::IterationComplete,
        session_id,
        Some(step_id),
        json!({"duration_sec": duration_sec, "tokens": tokens, "tokens_sec": tokens_sec}),
    )
}

pub fn iteration_fail(session_id: &str, step_id: &str, error: &str) -> ExperimentEvent {
    event(
        ExperimentEventKind::IterationFail,
        session_id,
        Some(step_id),
        json!({"error": error}),
    )
}

pub fn validation(
    session_id: &str,
    step_id: &str,
    command: &str,
    status: &str,
    output: &str,
) -> ExperimentEvent {
    event(
        ExperimentEventKind::Validation,
        session_id,
        Some(step_id),
        json!({"command": command, "status": status, "output": output}),
    )
}

pub fn flat(kind: &str, data: Value) -> FlatEvent {
    FlatEvent {
        kind: kind.to_string(),
        time: Utc::now(),
        data,
    }
}
