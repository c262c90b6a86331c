// Device file persistence
// Loads and saves the device collection as a single JSON array

use super::model::Device;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Error types for persistence operations
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File I/O error other than a missing file on read
    #[error("IO error on {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file exists but is not a valid device array
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Load devices from a JSON file
///
/// # Returns
/// * `Ok(Vec<Device>)` - Parsed devices, or an empty list if the file does not exist
/// * `Err(PersistenceError)` - If the file could not be read or parsed
pub async fn load_from_file(path: &Path) -> Result<Vec<Device>, PersistenceError> {
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    let devices = serde_json::from_str(&json)?;
    Ok(devices)
}

/// Save devices to a JSON file, replacing its contents
///
/// The write is not atomic: a crash mid-write can leave a truncated file.
/// Creates the parent directory if it is missing.
pub async fn save_to_file(path: &Path, devices: &[Device]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| PersistenceError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(devices)?;
    fs::write(path, json)
        .await
        .map_err(|e| PersistenceError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn device(id: &str) -> Device {
        Device {
            id: id.to_string(),
            name: id.to_uppercase(),
            device_type: "Server".to_string(),
            os: "Debian".to_string(),
            lat: 0.0,
            lng: 0.0,
            monitor_id: None,
            url: None,
            rack_position: None,
            rack_height: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.json");

        save_to_file(&path, &[device("alpha"), device("beta")])
            .await
            .unwrap();
        let loaded = load_from_file(&path).await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "alpha");
        assert_eq!(loaded[1].id, "beta");
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let loaded = load_from_file(&dir.path().join("missing.json"))
            .await
            .unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("devices.json");

        save_to_file(&path, &[device("alpha")]).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.json");

        save_to_file(&path, &[device("alpha")]).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"));
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_from_file(&path).await;
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_from_file(dir.path()).await;
        assert!(matches!(result, Err(PersistenceError::Io { .. })));
    }
}
