use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use atc_types::{
    ExperimentEvent, ExperimentEventKind, ExperimentIteration, ExperimentSession, ExperimentStep,
    IterationStatus, SessionStatus, StepStatus, ValidationResult, ValidationStatus,
};

use crate::payload::{f64_field, str_field, str_list_field, u32_field, u64_field};

/// Mapping from session id to its experiment session tree, mutated by event
/// ingestion.
///
/// Every precondition failure is silent: the mutation is dropped but the
/// caller still rings and broadcasts the event, because subscribers may
/// reconstruct state differently.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<HashMap<String, ExperimentSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<ExperimentSession> {
        self.inner.read().unwrap().get(id).cloned()
    }

    pub fn put(&self, session: ExperimentSession) {
        self.inner
            .write()
            .unwrap()
            .insert(session.id.clone(), session);
    }

    /// Independent copy of all sessions, oldest start first.
    pub fn list(&self) -> Vec<ExperimentSession> {
        let mut sessions: Vec<_> = self.inner.read().unwrap().values().cloned().collect();
        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        sessions
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one event through the state machine.
    pub fn apply(&self, event: &ExperimentEvent) {
        use ExperimentEventKind::*;

        match &event.kind {
            SessionStart => self.start_session(event),
            SessionComplete => self.finish_session(event, SessionStatus::Completed),
            SessionFail => self.finish_session(event, SessionStatus::Failed),
            StepStart => self.start_step(event),
            StepComplete => self.finish_step(event, StepStatus::Completed),
            StepFail => self.finish_step(event, StepStatus::Failed),
            IterationStart => self.start_iteration(event),
            IterationComplete => self.finish_iteration(event, IterationStatus::Completed),
            IterationFail => self.finish_iteration(event, IterationStatus::Failed),
            Validation => self.attach_validation(event),
            // Rings and broadcasts only; no session state.
            Other(_) => {}
        }
    }

    fn start_session(&self, event: &ExperimentEvent) {
        let session = ExperimentSession {
            id: event.session_id.clone(),
            name: str_field(&event.data, "name").unwrap_or_else(|| event.session_id.clone()),
            start_time: event.time,
            status: SessionStatus::Running,
            current_step: 0,
            total_steps: u32_field(&event.data, "total_steps").unwrap_or(0),
            steps: Vec::new(),
        };
        // Duplicate session_start replaces the entry: last writer wins.
        self.put(session);
    }

    fn finish_session(&self, event: &ExperimentEvent, status: SessionStatus) {
        self.with_session(event, |session| {
            session.status = status;
        });
    }

    fn start_step(&self, event: &ExperimentEvent) {
        let Some(step_id) = event.step_id.clone() else {
            debug!(session_id = %event.session_id, "step_start without step_id dropped");
            return;
        };
        let time = event.time;
        let name = str_field(&event.data, "name").unwrap_or_default();
        let number = u32_field(&event.data, "number");

        self.with_session(event, |session| {
            let number = number.unwrap_or(session.steps.len() as u32 + 1);
            session.steps.push(ExperimentStep {
                id: step_id,
                name,
                number,
                status: StepStatus::Running,
                start_time: Some(time),
                end_time: None,
                iterations: Vec::new(),
                validation: None,
            });
            session.current_step = session.current_step.max(number);
        });
    }

    fn finish_step(&self, event: &ExperimentEvent, status: StepStatus) {
        let time = event.time;
        self.with_step(event, |step| {
            step.status = status;
            step.end_time = Some(time);
        });
    }

    fn start_iteration(&self, event: &ExperimentEvent) {
        let time = event.time;
        let number = u32_field(&event.data, "number");
        let model = str_field(&event.data, "model").unwrap_or_default();
        let host = str_field(&event.data, "host").unwrap_or_default();

        self.with_step(event, |step| {
            step.iterations.push(ExperimentIteration {
                number: number.unwrap_or(step.iterations.len() as u32 + 1),
                model,
                host,
                status: IterationStatus::Running,
                start_time: Some(time),
                end_time: None,
                duration_sec: 0.0,
                tokens: 0,
                tokens_sec: 0.0,
                error: None,
            });
        });
    }

    /// Terminal iteration events address the last iteration appended to the
    /// referenced step; there is no per-iteration id.
    fn finish_iteration(&self, event: &ExperimentEvent, status: IterationStatus) {
        let time = event.time;
        let duration_sec = f64_field(&event.data, "duration_sec");
        let tokens = u64_field(&event.data, "tokens");
        let tokens_sec = f64_field(&event.data, "tokens_sec");
        let error = str_field(&event.data, "error");

        self.with_step(event, |step| {
            let Some(iteration) = step.iterations.last_mut() else {
                debug!("iteration terminal event for step without iterations dropped");
                return;
            };
            iteration.status = status;
            iteration.end_time = Some(time);
            if let Some(d) = duration_sec {
                iteration.duration_sec = d;
            }
            if let Some(t) = tokens {
                iteration.tokens = t;
            }
            if let Some(ts) = tokens_sec {
                iteration.tokens_sec = ts;
            }
            if let Some(e) = error {
                iteration.error = Some(e);
            }
        });
    }

    fn attach_validation(&self, event: &ExperimentEvent) {
        let status = match str_field(&event.data, "status").as_deref() {
            Some("pass") => ValidationStatus::Pass,
            Some("fail") => ValidationStatus::Fail,
            _ => ValidationStatus::Skip,
        };
        let result = ValidationResult {
            command: str_field(&event.data, "command").unwrap_or_default(),
            status,
            output: str_field(&event.data, "output").unwrap_or_default(),
            errors: str_list_field(&event.data, "errors"),
            duration_sec: f64_field(&event.data, "duration_sec").unwrap_or(0.0),
        };
        self.with_step(event, |step| {
            step.validation = Some(result);
        });
    }

    fn with_session<F>(&self, event: &ExperimentEvent, f: F)
    where
        F: FnOnce(&mut ExperimentSession),
    {
        let mut sessions = self.inner.write().unwrap();
        match sessions.get_mut(&event.session_id) {
            Some(session) => f(session),
            None => debug!(session_id = %event.session_id, "event for unknown session dropped"),
        }
    }

    fn with_step<F>(&self, event: &ExperimentEvent, f: F)
    where
        F: FnOnce(&mut ExperimentStep),
    {
        let Some(step_id) = event.step_id.as_deref() else {
            debug!(session_id = %event.session_id, "step event without step_id dropped");
            return;
        };
        let mut sessions = self.inner.write().unwrap();
        let Some(session) = sessions.get_mut(&event.session_id) else {
            debug!(session_id = %event.session_id, "event for unknown session dropped");
            return;
        };
        match session.step_mut(step_id) {
            Some(step) => f(step),
            None => {
                debug!(session_id = %event.session_id, step_id, "event for unknown step dropped")
            }
        }
    }
}
