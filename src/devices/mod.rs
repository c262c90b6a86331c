// Device management module
// Handles the device data model, validation, and file-backed storage

pub mod model;
pub mod persistence;
pub mod store;
pub mod validation;

pub use model::{
    Device, DeviceCreateInput, DeviceId, DeviceStatus, DeviceUpdateInput, DeviceView,
    MonitorStatus, RACK_UNITS,
};
pub use persistence::PersistenceError;
pub use store::{DeviceStore, DeviceStoreError};
pub use validation::{FieldError, ValidationErrors};
