//! Device API handlers
//!
//! Contains HTTP request handlers for device CRUD operations. Mutating
//! handlers sit behind the admin middleware (see `router`).

use crate::error::AppError;
use crate::devices::{DeviceCreateInput, DeviceId, DeviceUpdateInput, DeviceView};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

/// Delete acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Always true on success
    pub success: bool,
}

/// GET /devices - List all devices (status unresolved)
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceView>>, AppError> {
    let devices = state.store.list().await?;
    Ok(Json(devices.into_iter().map(|d| d.unresolved()).collect()))
}

/// GET /devices/live - List all devices with monitor status merged
pub async fn list_live_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceView>>, AppError> {
    let devices = state.store.list().await?;
    let views = devices.into_iter().map(|d| d.unresolved()).collect();
    Ok(Json(state.status.resolve_devices(views).await))
}

/// GET /devices/:id - Get a specific device
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
) -> Result<Json<DeviceView>, AppError> {
    let device = state
        .store
        .get(&id)
        .await?
        .ok_or(AppError::DeviceNotFound(id))?;

    Ok(Json(device.unresolved()))
}

/// POST /devices - Create a new device
pub async fn create_device(
    State(state): State<AppState>,
    payload: Result<Json<DeviceCreateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DeviceView>), AppError> {
    let Json(input) = payload?;
    let device = state.store.create(input).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// PATCH /devices/:id - Partially update a device
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
    payload: Result<Json<DeviceUpdateInput>, JsonRejection>,
) -> Result<Json<DeviceView>, AppError> {
    let Json(input) = payload?;
    let device = state.store.update(&id, input).await?;
    Ok(Json(device))
}

/// DELETE /devices/:id - Delete a device
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.delete(&id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
