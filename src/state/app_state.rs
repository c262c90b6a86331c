// Application state
// Cloned into every handler; all members are shared handles

use crate::config::Config;
use crate::devices::DeviceStore;
use crate::status::{source_from_config, StatusAggregator};
use std::sync::Arc;
use std::time::Duration;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Device collection backed by the devices file
    pub store: Arc<DeviceStore>,
    /// Cached monitor status lookups
    pub status: Arc<StatusAggregator>,
}

impl AppState {
    /// Assemble state from already built components
    pub fn new(config: Config, store: DeviceStore, status: StatusAggregator) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            status: Arc::new(status),
        }
    }

    /// Build the store and status aggregator described by `config`
    ///
    /// Selects the Kuma source when `UPTIME_KUMA_URL` is set and the synthetic
    /// source otherwise.
    pub fn from_config(config: Config) -> Self {
        let store = DeviceStore::new(config.storage.devices_file.clone());

        // Shared client for connection pooling
        let client = reqwest::Client::new();
        let source = source_from_config(&config.status, client);
        let status = StatusAggregator::new(
            source,
            Duration::from_secs(config.status.cache_ttl_secs),
        );

        Self::new(config, store, status)
    }
}
