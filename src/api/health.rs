//! Health check handler

use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
    /// Whether statuses come from a real uptime monitor
    pub monitor_configured: bool,
}

/// GET /health - Liveness probe
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Homelab backend is healthy".to_string(),
        monitor_configured: state.status.is_configured(),
    })
}
