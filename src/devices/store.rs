//! File-backed device store
//!
//! Every operation reloads the whole collection from disk, mutates it in
//! memory and writes the whole collection back. Writes are serialized by a
//! mutex held across the file write, so no two writes interleave their bytes.
//! The read-modify-write window is not covered: two concurrent updates can
//! race and the later writer silently discards the earlier change.

use super::model::{Device, DeviceCreateInput, DeviceId, DeviceUpdateInput, DeviceView};
use super::persistence::{self, PersistenceError};
use super::validation::{self, ValidationErrors};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors returned by device store operations
#[derive(Error, Debug)]
pub enum DeviceStoreError {
    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// No device has the given id
    #[error("Device with ID \"{0}\" not found")]
    NotFound(DeviceId),

    /// The id derived from the name is already taken
    #[error("Device with ID \"{0}\" already exists")]
    Duplicate(DeviceId),

    /// Reading or writing the devices file failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Device collection persisted in one JSON file
#[derive(Debug)]
pub struct DeviceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DeviceStore {
    /// Create a store backed by `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All devices in file order
    pub async fn list(&self) -> Result<Vec<Device>, DeviceStoreError> {
        Ok(persistence::load_from_file(&self.path).await?)
    }

    /// Find a device by id, `None` if there is no match
    pub async fn get(&self, id: &str) -> Result<Option<Device>, DeviceStoreError> {
        let devices = self.list().await?;
        Ok(devices.into_iter().find(|d| d.id == id))
    }

    /// Validate input, derive the id from the name and append the device
    pub async fn create(&self, input: DeviceCreateInput) -> Result<DeviceView, DeviceStoreError> {
        validation::validate_create(&input).map_err(DeviceStoreError::Validation)?;

        let id = validation::slugify(&input.name);
        let mut devices = self.list().await?;
        if devices.iter().any(|d| d.id == id) {
            return Err(DeviceStoreError::Duplicate(id));
        }

        let device = Device::from_input(id, input);
        devices.push(device.clone());
        self.write(&devices).await?;

        tracing::info!(device_id = %device.id, "Device created");
        Ok(device.unresolved())
    }

    /// Merge the provided fields onto an existing device
    pub async fn update(
        &self,
        id: &str,
        input: DeviceUpdateInput,
    ) -> Result<DeviceView, DeviceStoreError> {
        validation::validate_update(&input).map_err(DeviceStoreError::Validation)?;

        let mut devices = self.list().await?;
        let device = devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DeviceStoreError::NotFound(id.to_string()))?;

        device.apply_update(input);
        validation::validate_rack_placement(device.rack_position, device.rack_height)
            .map_err(DeviceStoreError::Validation)?;
        let updated = device.clone();

        self.write(&devices).await?;

        tracing::info!(device_id = %updated.id, "Device updated");
        Ok(updated.unresolved())
    }

    /// Remove a device by id
    pub async fn delete(&self, id: &str) -> Result<(), DeviceStoreError> {
        let devices = self.list().await?;
        let before = devices.len();
        let remaining: Vec<Device> = devices.into_iter().filter(|d| d.id != id).collect();

        if remaining.len() == before {
            return Err(DeviceStoreError::NotFound(id.to_string()));
        }

        self.write(&remaining).await?;

        tracing::info!(device_id = %id, "Device deleted");
        Ok(())
    }

    async fn write(&self, devices: &[Device]) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        persistence::save_to_file(&self.path, devices).await
    }
}
