use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the configured door is currently believed reachable.
    pub door_online: bool,
}

/// GET /health -- returns service health and door connectivity.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let door_online = state.controller.status().connectivity.is_online();

    Json(HealthResponse {
        status: if door_online { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        door_online,
    })
}

/// Mount health check routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
