//! HTTP router
//!
//! Public read routes plus admin-only mutating routes. The admin middleware
//! is a route layer, so it runs only for matched admin routes and before any
//! body extraction.

use crate::api;
use crate::auth::require_admin;
use crate::state::AppState;
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
    Router,
};
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/devices", get(api::devices::list_devices))
        .route("/devices/live", get(api::devices::list_live_devices))
        .route("/devices/:id", get(api::devices::get_device))
        .route("/status/monitors", get(api::status::get_monitor_statuses))
        .route("/rack", get(api::rack::get_rack));

    let admin = Router::new()
        .route("/devices", post(api::devices::create_device))
        .route(
            "/devices/:id",
            patch(api::devices::update_device).delete(api::devices::delete_device),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public
        .merge(admin)
        // Middleware (order matters - request_id should be first)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
