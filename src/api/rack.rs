//! Rack layout API handler
//!
//! Places rack-mounted devices into the 42U rack for the 3D rack view.

use crate::devices::{DeviceView, RACK_UNITS};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;

/// A device occupying rack units
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RackSlot {
    /// Device with merged status
    #[serde(flatten)]
    pub device: DeviceView,
    /// Lowest occupied unit (1 = bottom of the rack)
    pub bottom_unit: u32,
    /// Highest occupied unit
    pub top_unit: u32,
}

/// Two devices claiming the same rack unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RackOverlap {
    /// Id of the upper device
    pub upper: String,
    /// Id of the lower device
    pub lower: String,
}

/// Rack contents, top of rack first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RackLayout {
    /// Total units in the rack
    pub rack_units: u32,
    /// Mounted devices, ordered from the top of the rack down
    pub slots: Vec<RackSlot>,
    /// Pairs of devices whose unit ranges intersect
    pub overlaps: Vec<RackOverlap>,
}

/// Build the layout from device views
///
/// Devices without a rack position are not mounted. A missing height counts
/// as 1U. The file is not re-validated on load, so unit ranges saturate
/// instead of overflowing.
pub fn build_rack_layout(devices: Vec<DeviceView>) -> RackLayout {
    let mut slots: Vec<RackSlot> = devices
        .into_iter()
        .filter_map(|view| {
            let bottom = view.device.rack_position?;
            let height = view.device.rack_height.unwrap_or(1).max(1);
            Some(RackSlot {
                device: view,
                bottom_unit: bottom,
                top_unit: bottom.saturating_add(height - 1),
            })
        })
        .collect();

    slots.sort_by(|a, b| {
        b.top_unit
            .cmp(&a.top_unit)
            .then_with(|| a.device.device.id.cmp(&b.device.device.id))
    });

    let mut overlaps = Vec::new();
    for (i, upper) in slots.iter().enumerate() {
        for lower in &slots[i + 1..] {
            if lower.top_unit >= upper.bottom_unit && lower.bottom_unit <= upper.top_unit {
                overlaps.push(RackOverlap {
                    upper: upper.device.device.id.clone(),
                    lower: lower.device.device.id.clone(),
                });
            }
        }
    }

    RackLayout {
        rack_units: RACK_UNITS,
        slots,
        overlaps,
    }
}

/// GET /rack - Rack-mounted devices with status merged
pub async fn get_rack(State(state): State<AppState>) -> Result<Json<RackLayout>, AppError> {
    let devices = state.store.list().await?;
    let mounted: Vec<DeviceView> = devices
        .into_iter()
        .filter(|d| d.rack_position.is_some())
        .map(|d| d.unresolved())
        .collect();

    let resolved = state.status.resolve_devices(mounted).await;
    let layout = build_rack_layout(resolved);
    if !layout.overlaps.is_empty() {
        tracing::warn!(overlaps = layout.overlaps.len(), "Rack has overlapping devices");
    }

    Ok(Json(layout))
}
