//! Admin-port handlers: liveness probe, version, metrics scrape.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use cache_backend::BackendError;

use crate::state::AdminState;

const HEALTH_PROBE_KEY: &str = "__cache_server_health_probe__";

/// `GET /status`: 204 if the backend is reachable, 500 otherwise.
///
/// A miss on a key that was never written is a healthy backend; only a
/// connection or internal failure counts as unhealthy.
pub async fn status(State(state): State<AdminState>) -> StatusCode {
    match state.backend.get(HEALTH_PROBE_KEY).await {
        Ok(_) | Err(BackendError::KeyNotFound) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /version`.
pub async fn version() -> impl IntoResponse {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// Metrics scrape endpoint, served at the configured `scrape_path`.
pub async fn metrics(State(state): State<AdminState>) -> impl IntoResponse {
    state.scrape_handle.render()
}
