//! Error types and error handling for the application
//!
//! This module defines the HTTP-facing error type. Domain errors from the
//! device store convert into it, and every variant renders as a JSON body of
//! the form `{"error": ..., "status": ...}` via `IntoResponse`.

use crate::devices::{DeviceStoreError, ValidationErrors};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body or fields failed validation
    #[error("Validation error")]
    Validation(ValidationErrors),

    /// Device with the given ID was not found
    #[error("Device not found")]
    DeviceNotFound(String),

    /// A device with the derived ID already exists
    #[error("Device with ID \"{0}\" already exists")]
    DuplicateDevice(String),

    /// Request is malformed in a way that is not tied to a device field
    #[error("{0}")]
    BadRequest(String),

    /// Admin credentials missing or wrong
    #[error("Unauthorized")]
    Unauthorized,

    /// Device file could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] crate::devices::PersistenceError),
}

impl From<DeviceStoreError> for AppError {
    fn from(err: DeviceStoreError) -> Self {
        match err {
            DeviceStoreError::Validation(errors) => AppError::Validation(errors),
            DeviceStoreError::NotFound(id) => AppError::DeviceNotFound(id),
            DeviceStoreError::Duplicate(id) => AppError::DuplicateDevice(id),
            DeviceStoreError::Persistence(e) => AppError::Storage(e),
        }
    }
}

// Malformed JSON and wrong field types are user-correctable, so 400 rather
// than axum's default 422
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateDevice(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Validation(details) => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
                "details": details,
            }),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Device storage failure");
                json!({
                    "error": "Failed to access device storage",
                    "status": status.as_u16(),
                })
            }
            _ => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        if matches!(self, AppError::Unauthorized) {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin Area\"")],
                Json(body),
            )
                .into_response();
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = AppError::DeviceNotFound("ghost".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Device not found");
        assert_eq!(json["status"], 404);
    }

    #[tokio::test]
    async fn test_validation_response_has_details() {
        let errors = ValidationErrors::single("lat", "must be between -90 and 90");
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Validation error");
        assert_eq!(json["details"][0]["field"], "lat");
    }

    #[tokio::test]
    async fn test_duplicate_is_bad_request_with_message() {
        let response = AppError::from(DeviceStoreError::Duplicate("tower-nas".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Device with ID \"tower-nas\" already exists");
    }

    #[tokio::test]
    async fn test_unauthorized_has_challenge_header() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Admin Area\""
        );

        let json = body_json(response).await;
        assert_eq!(json["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let err = crate::devices::PersistenceError::Io {
            path: "/data/devices.json".to_string(),
            source: io,
        };
        let response = AppError::Storage(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to access device storage");
    }
}
