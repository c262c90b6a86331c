//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Empty variables count as unset.

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Device storage configuration
    pub storage: StorageConfig,
    /// Uptime monitor configuration
    pub status: StatusConfig,
    /// Admin credentials
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Device storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding the device collection
    pub devices_file: PathBuf,
}

/// Uptime monitor configuration
#[derive(Debug, Clone)]
pub struct StatusConfig {
    /// Base URL of the Uptime Kuma instance; `None` selects synthetic statuses
    pub kuma_url: Option<String>,
    /// Bearer token for the Kuma API
    pub kuma_api_key: Option<String>,
    /// How long a refresh is served from cache (in seconds)
    pub cache_ttl_secs: u64,
}

/// Admin credentials for mutating endpoints
///
/// The defaults are for local development only.
#[derive(Clone)]
pub struct AdminConfig {
    /// Value expected in the `x-admin-api-key` header
    pub api_key: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
}

// Keep secrets out of the startup log
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_key: "dev-admin-key".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
            },
            storage: StorageConfig {
                devices_file: PathBuf::from("data").join("devices.json"),
            },
            status: StatusConfig {
                kuma_url: None,
                kuma_api_key: None,
                cache_ttl_secs: 30,
            },
            admin: AdminConfig::default(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let devices_file = match (non_empty_var("DEVICES_FILE"), non_empty_var("DATA_DIR")) {
            (Some(file), _) => PathBuf::from(file),
            (None, Some(dir)) => PathBuf::from(dir).join("devices.json"),
            (None, None) => defaults.storage.devices_file,
        };

        Self {
            server: ServerConfig {
                port: non_empty_var("PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
                host: non_empty_var("HOST").unwrap_or(defaults.server.host),
            },
            storage: StorageConfig { devices_file },
            status: StatusConfig {
                kuma_url: non_empty_var("UPTIME_KUMA_URL"),
                kuma_api_key: non_empty_var("UPTIME_KUMA_API_KEY"),
                cache_ttl_secs: non_empty_var("STATUS_CACHE_TTL_SECS")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.status.cache_ttl_secs),
            },
            admin: AdminConfig {
                api_key: non_empty_var("ADMIN_API_KEY").unwrap_or(defaults.admin.api_key),
                username: non_empty_var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
                password: non_empty_var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
