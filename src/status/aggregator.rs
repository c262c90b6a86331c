//! Status aggregation
//!
//! Resolves monitor ids to statuses through the cache, refreshing from the
//! monitor source when the cache cannot answer the whole request.

use super::cache::{Clock, StatusCache, SystemClock};
use super::source::MonitorSource;
use crate::devices::{DeviceStatus, DeviceView, MonitorStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Cached front for a monitor source
pub struct StatusAggregator {
    source: Arc<dyn MonitorSource>,
    cache: Mutex<StatusCache>,
    clock: Arc<dyn Clock>,
}

impl StatusAggregator {
    /// Create an aggregator using the system clock
    pub fn new(source: Arc<dyn MonitorSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    /// Create an aggregator with an injected clock
    pub fn with_clock(source: Arc<dyn MonitorSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: Mutex::new(StatusCache::new(ttl)),
            clock,
        }
    }

    /// How long a refresh is served from cache
    pub async fn ttl(&self) -> Duration {
        self.cache.lock().await.ttl()
    }

    /// True when statuses come from a real monitor
    pub fn is_configured(&self) -> bool {
        self.source.is_configured()
    }

    /// Resolve statuses for an ordered, de-duplicated list of monitor ids
    ///
    /// Served from cache only when the cache is fresh and holds exactly this
    /// id set. Otherwise the full set is fetched and replaces the cache.
    /// The cache lock is not held during the fetch, so concurrent refreshes
    /// race and the last one to finish wins.
    pub async fn resolve(&self, ids: &[String]) -> Vec<MonitorStatus> {
        if ids.is_empty() {
            return Vec::new();
        }

        let now = self.clock.now();
        if let Some(hit) = self.cache.lock().await.lookup(ids, now) {
            tracing::debug!(monitor_count = ids.len(), "Monitor statuses served from cache");
            return hit;
        }

        let statuses = self.source.fetch_statuses(ids).await;

        self.cache
            .lock()
            .await
            .replace(statuses.clone(), self.clock.now());
        tracing::debug!(monitor_count = ids.len(), "Monitor status cache refreshed");

        statuses
    }

    /// Resolve and merge statuses onto device views
    pub async fn resolve_devices(&self, devices: Vec<DeviceView>) -> Vec<DeviceView> {
        let ids = monitor_ids(&devices);
        let statuses = self.resolve(&ids).await;
        merge_statuses(devices, &statuses)
    }
}

/// Distinct monitor ids of `devices`, in first-seen order
pub fn monitor_ids(devices: &[DeviceView]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in devices
        .iter()
        .filter_map(|d| d.device.monitor_id.as_deref())
        .filter(|id| !id.trim().is_empty())
    {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Set each device's status from its monitor
///
/// Devices without a monitor id, or whose monitor is missing from
/// `statuses`, are `unknown`.
pub fn merge_statuses(devices: Vec<DeviceView>, statuses: &[MonitorStatus]) -> Vec<DeviceView> {
    let by_id: HashMap<&str, DeviceStatus> = statuses
        .iter()
        .map(|s| (s.monitor_id.as_str(), s.state))
        .collect();

    devices
        .into_iter()
        .map(|mut view| {
            view.status = view
                .device
                .monitor_id
                .as_deref()
                .and_then(|id| by_id.get(id).copied())
                .unwrap_or(DeviceStatus::Unknown);
            view
        })
        .collect()
}
