//! Admin authentication
//!
//! Placeholder credential check for mutating device routes: either the
//! `x-admin-api-key` header or HTTP Basic credentials must match the
//! configured values. This is not a security boundary; put real SSO in front
//! of the service before exposing it.

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Header carrying the admin API key
pub const ADMIN_KEY_HEADER: &str = "x-admin-api-key";

/// True if the request headers carry valid admin credentials
pub fn is_admin(headers: &HeaderMap, admin: &AdminConfig) -> bool {
    let key_ok = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == admin.api_key)
        .unwrap_or(false);
    if key_ok {
        return true;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(decode_basic)
        .map(|(user, pass)| user == admin.username && pass == admin.password)
        .unwrap_or(false)
}

fn decode_basic(encoded: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(bytes).ok()?;
    let (user, pass) = credentials.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Middleware rejecting requests without admin credentials
///
/// Runs before body extraction, so unauthenticated callers never reach
/// validation or storage.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_admin(request.headers(), &state.config.admin) {
        tracing::warn!(
            method = %request.method(),
            uri = %request.uri(),
            "Rejected unauthenticated admin request"
        );
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(user: &str, pass: &str) -> HeaderValue {
        let token = STANDARD.encode(format!("{}:{}", user, pass));
        HeaderValue::from_str(&format!("Basic {}", token)).unwrap()
    }

    #[test]
    fn test_api_key_header() {
        let admin = AdminConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_KEY_HEADER, HeaderValue::from_static("dev-admin-key"));
        assert!(is_admin(&headers, &admin));

        headers.insert(ADMIN_KEY_HEADER, HeaderValue::from_static("wrong"));
        assert!(!is_admin(&headers, &admin));
    }

    #[test]
    fn test_basic_credentials() {
        let admin = AdminConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, basic("admin", "admin"));
        assert!(is_admin(&headers, &admin));

        headers.insert(header::AUTHORIZATION, basic("admin", "nope"));
        assert!(!is_admin(&headers, &admin));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let admin = AdminConfig {
            password: "a:b".to_string(),
            ..AdminConfig::default()
        };
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, basic("admin", "a:b"));
        assert!(is_admin(&headers, &admin));
    }

    #[test]
    fn test_missing_or_garbled_credentials() {
        let admin = AdminConfig::default();
        assert!(!is_admin(&HeaderMap::new(), &admin));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert!(!is_admin(&headers, &admin));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer dev-admin-key"));
        assert!(!is_admin(&headers, &admin));
    }
}
