//! Monitor status sources
//!
//! `KumaSource` queries an Uptime Kuma instance. `SyntheticSource` fabricates
//! statuses and is only selected when no Kuma endpoint is configured.
//! Neither surfaces upstream failures: anything that goes wrong resolves
//! every requested id to `unknown`.

use crate::config::StatusConfig;
use crate::devices::{DeviceStatus, MonitorStatus};
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors talking to the uptime monitor
///
/// Internal to this module: callers only ever see `unknown` statuses.
#[derive(Error, Debug)]
pub enum StatusSourceError {
    /// Connection failed or the body could not be read/decoded
    #[error("Failed to reach uptime monitor: {0}")]
    Request(#[from] reqwest::Error),

    /// The monitor answered with a non-success status
    #[error("Uptime monitor returned HTTP {0}")]
    Status(u16),
}

/// A provider of monitor liveness
#[async_trait]
pub trait MonitorSource: Send + Sync {
    /// One status per requested id, in request order
    async fn fetch_statuses(&self, ids: &[String]) -> Vec<MonitorStatus>;

    /// True when backed by a real upstream endpoint
    fn is_configured(&self) -> bool;
}

/// Pick the source for the current configuration
///
/// A configured Kuma URL always wins; the synthetic source exists only for
/// local development without a monitor.
pub fn source_from_config(config: &StatusConfig, client: reqwest::Client) -> Arc<dyn MonitorSource> {
    match &config.kuma_url {
        Some(url) => Arc::new(KumaSource::new(client, url.clone(), config.kuma_api_key.clone())),
        None => Arc::new(SyntheticSource),
    }
}

/// Uptime Kuma monitor list response
#[derive(Debug, Deserialize)]
struct KumaMonitorsResponse {
    #[serde(default)]
    monitors: Vec<Value>,
}

/// Source backed by the Uptime Kuma HTTP API
#[derive(Debug, Clone)]
pub struct KumaSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl KumaSource {
    /// Create a source for the Kuma instance at `base_url`
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn request_monitors(&self) -> Result<Vec<Value>, StatusSourceError> {
        let url = format!("{}/api/monitors", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(url = %url, "Fetching monitor list from Uptime Kuma");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusSourceError::Status(status.as_u16()));
        }

        let body: KumaMonitorsResponse = response.json().await?;
        Ok(body.monitors)
    }
}

#[async_trait]
impl MonitorSource for KumaSource {
    async fn fetch_statuses(&self, ids: &[String]) -> Vec<MonitorStatus> {
        match self.request_monitors().await {
            Ok(monitors) => ids
                .iter()
                .map(|id| {
                    let state = monitors
                        .iter()
                        .find(|m| monitor_matches(m, id))
                        .map(kuma_state)
                        .unwrap_or(DeviceStatus::Unknown);
                    MonitorStatus::new(id.as_str(), state)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    monitor_count = ids.len(),
                    "Uptime monitor unavailable, reporting unknown status"
                );
                ids.iter().map(|id| MonitorStatus::unknown(id.as_str())).collect()
            }
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Development fallback producing pseudo-random statuses
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

#[async_trait]
impl MonitorSource for SyntheticSource {
    async fn fetch_statuses(&self, ids: &[String]) -> Vec<MonitorStatus> {
        tracing::warn!(
            monitor_count = ids.len(),
            "UPTIME_KUMA_URL not configured, returning synthetic statuses"
        );

        let mut rng = rand::rng();
        ids.iter()
            .map(|id| {
                // Roughly 70% online, 15% offline, 15% unknown
                let state = if rng.random::<f64>() > 0.3 {
                    DeviceStatus::Online
                } else if rng.random::<bool>() {
                    DeviceStatus::Offline
                } else {
                    DeviceStatus::Unknown
                };
                MonitorStatus::new(id.as_str(), state)
            })
            .collect()
    }

    fn is_configured(&self) -> bool {
        false
    }
}

// Kuma ids are numeric while ours are strings; compare textually
fn monitor_matches(monitor: &Value, id: &str) -> bool {
    ["id", "monitorID"]
        .iter()
        .filter_map(|key| monitor.get(*key))
        .any(|value| match value {
            Value::String(s) => s == id,
            Value::Number(n) => n.to_string() == id,
            _ => false,
        })
}

/// Map a Kuma monitor object to the three-state model
///
/// Kuma reports 1 = up, 0 = down, 2 = pending; only up and down are known.
/// Integer and float encodings (`1`, `1.0`) are treated alike.
pub fn kuma_state(monitor: &Value) -> DeviceStatus {
    let status = monitor.get("status").and_then(Value::as_f64);
    let active = monitor.get("active").and_then(Value::as_f64);

    if status == Some(1.0) || active == Some(1.0) {
        DeviceStatus::Online
    } else if status == Some(0.0) || active == Some(0.0) {
        DeviceStatus::Offline
    } else {
        DeviceStatus::Unknown
    }
}
