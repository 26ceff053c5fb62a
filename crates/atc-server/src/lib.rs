//! The tower's HTTP/WebSocket surface.
//!
//! Thin by design: every handler validates the boundary and hands off to
//! the hub. Successful ingress returns 200 regardless of downstream
//! broadcast; the hub never surfaces internal errors to a subscriber.

mod assets;
mod routes;
mod ws;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use atc_hub::Hub;

/// Shared application state passed to all HTTP/WS handlers via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
}

pub fn router(hub: Arc<Hub>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/ws", get(ws::upgrade))
        .route("/events", post(routes::post_events))
        .route("/experiment", post(routes::post_experiment))
        .route("/sessions", get(routes::list_sessions))
        .route("/sessions/{id}", get(routes::show_session))
        .route("/poll", get(routes::get_poll).post(routes::set_poll))
        .route("/healthz", get(routes::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { hub })
}

/// Serve until ctrl-c. The caller binds the listener, so a bind failure can
/// stay the one fatal startup error.
pub async fn serve(listener: TcpListener, hub: Arc<Hub>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, mode = %hub.mode(), "tower listening");

    axum::serve(listener, router(hub))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
