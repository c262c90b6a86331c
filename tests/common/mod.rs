//! Shared helpers for router-level integration tests

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use homelab_backend::config::Config;
use homelab_backend::devices::DeviceStore;
use homelab_backend::state::AppState;
use homelab_backend::status::{MonitorSource, StatusAggregator, SyntheticSource};
use homelab_backend::build_router;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "dev-admin-key";

/// Test app with its backing directory; the directory lives as long as the app
pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
}

impl TestApp {
    /// App backed by an empty temp dir and the synthetic status source
    pub fn new() -> Self {
        Self::with_source(Arc::new(SyntheticSource))
    }

    /// App using the given status source
    pub fn with_source(source: Arc<dyn MonitorSource>) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.devices_file = dir.path().join("devices.json");

        let store = DeviceStore::new(config.storage.devices_file.clone());
        let status = StatusAggregator::new(source, Duration::from_secs(30));
        let router = build_router(AppState::new(config, store, status));

        Self { dir, router }
    }

    pub fn devices_file(&self) -> std::path::PathBuf {
        self.dir.path().join("devices.json")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Authenticated JSON request
    pub async fn admin_json(
        &self,
        method: Method,
        uri: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-admin-api-key", ADMIN_KEY)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Authenticated request without body
    pub async fn admin(&self, method: Method, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-admin-api-key", ADMIN_KEY)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn tower_nas() -> serde_json::Value {
    serde_json::json!({
        "name": "Tower NAS",
        "type": "Storage",
        "os": "TrueNAS",
        "lat": 40.7,
        "lng": -73.9
    })
}
