use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use atc_types::{ExperimentEvent, FlatEvent};

use crate::AppState;
use crate::assets::dashboard_html;

/// `GET /` — the mode-selected dashboard.
pub async fn index(State(state): State<AppState>) -> Html<&'static str> {
    Html(dashboard_html(state.hub.mode()))
}

/// `POST /events` — append a flat event and broadcast it.
pub async fn post_events(
    State(state): State<AppState>,
    Json(event): Json<FlatEvent>,
) -> Json<serde_json::Value> {
    state.hub.ingest_flat(event);
    Json(json!({"status": "ok"}))
}

/// `POST /experiment` — run an experiment event through the session state
/// machine, ring it, and broadcast it.
pub async fn post_experiment(
    State(state): State<AppState>,
    Json(event): Json<ExperimentEvent>,
) -> Json<serde_json::Value> {
    state.hub.ingest_experiment(event);
    Json(json!({"status": "ok"}))
}

/// `GET /sessions` — every known session, oldest first.
pub async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!(state.hub.sessions()))
}

/// `GET /sessions/{id}`
pub async fn show_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.hub.session(&id) {
        Some(session) => Json(json!(session)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "error": "unknown session"})),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PollParams {
    pub seconds: u64,
}

/// `GET /poll` — the current poll interval.
pub async fn get_poll(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({"interval_seconds": state.hub.interval_secs()}))
}

/// `POST /poll?seconds=N` — change the cadence; takes effect next cycle.
pub async fn set_poll(
    State(state): State<AppState>,
    Query(params): Query<PollParams>,
) -> Response {
    match state.hub.set_interval_secs(params.seconds) {
        Ok(()) => Json(json!({"status": "ok", "interval_seconds": params.seconds})).into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "error": err.to_string()})),
        )
            .into_response(),
    }
}

/// `GET /healthz` — liveness for external monitoring.
pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "mode": state.hub.mode(),
        "subscribers": state.hub.subscriber_count(),
    }))
}
