// Device data model
// Persisted device records, derived status, and create/update payloads

use serde::{Deserialize, Serialize};

/// Unique identifier for a device (slug derived from its name)
pub type DeviceId = String;

/// Number of rack units in the homelab rack
pub const RACK_UNITS: u32 = 42;

/// Liveness of a device as reported by the uptime monitor
///
/// Never persisted. Devices read from disk are `Unknown` until merged with
/// monitor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Monitor reports the device as up
    Online,
    /// Monitor reports the device as down
    Offline,
    /// No monitor, no data, or the monitor could not be reached
    #[default]
    Unknown,
}

/// Device record as stored in the devices file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Slug derived from the name at creation time
    pub id: DeviceId,
    /// Display name
    pub name: String,
    /// Type label (Server, Storage, Network, ...)
    #[serde(rename = "type")]
    pub device_type: String,
    /// Operating system label
    pub os: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Identifier of the matching monitor in the uptime service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
    /// Management URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Rack unit of the bottom edge, counted from the bottom (1-42)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_position: Option<u32>,
    /// Height in rack units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_height: Option<u32>,
}

impl Device {
    /// Build a new record from validated create input
    pub fn from_input(id: DeviceId, input: DeviceCreateInput) -> Self {
        Self {
            id,
            name: input.name,
            device_type: input.device_type,
            os: input.os,
            lat: input.lat,
            lng: input.lng,
            monitor_id: input.monitor_id,
            url: input.url,
            rack_position: input.rack_position,
            rack_height: input.rack_height,
        }
    }

    /// Merge the provided fields of an update onto this record
    /// Fields absent from the update are retained
    pub fn apply_update(&mut self, update: DeviceUpdateInput) {
        let DeviceUpdateInput {
            name,
            device_type,
            os,
            lat,
            lng,
            monitor_id,
            url,
            rack_position,
            rack_height,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(device_type) = device_type {
            self.device_type = device_type;
        }
        if let Some(os) = os {
            self.os = os;
        }
        if let Some(lat) = lat {
            self.lat = lat;
        }
        if let Some(lng) = lng {
            self.lng = lng;
        }
        if monitor_id.is_some() {
            self.monitor_id = monitor_id;
        }
        if url.is_some() {
            self.url = url;
        }
        if rack_position.is_some() {
            self.rack_position = rack_position;
        }
        if rack_height.is_some() {
            self.rack_height = rack_height;
        }
    }

    /// Attach a status, producing the view returned by the API
    pub fn with_status(self, status: DeviceStatus) -> DeviceView {
        DeviceView {
            device: self,
            status,
        }
    }

    /// View with status not yet resolved against the monitor
    pub fn unresolved(self) -> DeviceView {
        self.with_status(DeviceStatus::Unknown)
    }
}

/// A device together with its derived status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceView {
    /// Persisted fields
    #[serde(flatten)]
    pub device: Device,
    /// Derived liveness
    pub status: DeviceStatus,
}

/// Status of one monitor, keyed by its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Monitor identifier in the uptime service
    pub monitor_id: String,
    /// Three-state liveness
    pub state: DeviceStatus,
}

impl MonitorStatus {
    /// Create a status entry
    pub fn new(monitor_id: impl Into<String>, state: DeviceStatus) -> Self {
        Self {
            monitor_id: monitor_id.into(),
            state,
        }
    }

    /// Entry for a monitor whose state could not be determined
    pub fn unknown(monitor_id: impl Into<String>) -> Self {
        Self::new(monitor_id, DeviceStatus::Unknown)
    }
}

/// Create device request payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCreateInput {
    /// Display name, also the source of the id
    pub name: String,
    /// Type label
    #[serde(rename = "type")]
    pub device_type: String,
    /// Operating system label
    pub os: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Optional monitor identifier
    #[serde(default)]
    pub monitor_id: Option<String>,
    /// Optional management URL (may be empty)
    #[serde(default)]
    pub url: Option<String>,
    /// Optional rack unit position
    #[serde(default)]
    pub rack_position: Option<u32>,
    /// Optional height in rack units
    #[serde(default)]
    pub rack_height: Option<u32>,
}

/// Partial update payload; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeviceUpdateInput {
    /// New display name (the id does not change)
    #[serde(default)]
    pub name: Option<String>,
    /// New type label
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    /// New operating system label
    #[serde(default)]
    pub os: Option<String>,
    /// New latitude
    #[serde(default)]
    pub lat: Option<f64>,
    /// New longitude
    #[serde(default)]
    pub lng: Option<f64>,
    /// New monitor identifier
    #[serde(default)]
    pub monitor_id: Option<String>,
    /// New management URL
    #[serde(default)]
    pub url: Option<String>,
    /// New rack unit position
    #[serde(default)]
    pub rack_position: Option<u32>,
    /// New height in rack units
    #[serde(default)]
    pub rack_height: Option<u32>,
}
