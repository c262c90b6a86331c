//! Monitor status API handler

use crate::devices::MonitorStatus;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::time::Duration;

/// Client-side caching hint derived from the server cache TTL
///
/// Clients may keep serving a stale answer for twice the TTL while they
/// revalidate.
pub fn cache_control(ttl: Duration) -> String {
    let max_age = ttl.as_secs();
    format!(
        "public, max-age={}, stale-while-revalidate={}",
        max_age,
        max_age.saturating_mul(2)
    )
}

/// Query parameters for status lookups
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Comma-separated monitor ids
    pub ids: Option<String>,
}

/// Split a comma-separated id list
///
/// Trims entries, drops blanks, and removes duplicates keeping the first
/// occurrence.
pub fn parse_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// GET /status/monitors?ids=a,b,c - Resolve monitor statuses
pub async fn get_monitor_statuses(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    // `?ids=` counts as missing; `?ids=,,` is present but empty
    let raw = query
        .ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing \"ids\" query parameter".to_string()))?;

    let ids = parse_ids(&raw);
    let statuses: Vec<MonitorStatus> = state.status.resolve(&ids).await;
    let cache_header = cache_control(state.status.ttl().await);

    Ok((
        [(header::CACHE_CONTROL, cache_header)],
        Json(statuses),
    ))
}
