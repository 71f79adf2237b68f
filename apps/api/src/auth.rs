/// Identity provider client and request authentication.
///
/// Every authenticated route resolves the caller's bearer token against the
/// identity provider, per request. Role or identity claims supplied by the
/// client body are never trusted; admin status comes from the user_roles
/// table keyed by the resolved user id.
use axum::http::{header, HeaderMap};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Auth API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Client for the identity provider's REST API. One instance lives in
/// `AppState`; token resolution uses the caller's bearer token, account
/// deletion uses the service key.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl AuthClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Resolves a bearer token to the user it belongs to.
    ///
    /// Any rejection from the provider (401/403/404) means the token is
    /// invalid or expired. A 2xx body without a parseable user id is treated
    /// the same way.
    pub async fn resolve_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(format!("{}/user", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .header("apikey", &self.service_key)
            .send()
            .await?;

        let status = response.status();

        if matches!(status.as_u16(), 401 | 403 | 404) {
            return Err(AuthError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|_| AuthError::Unauthorized)
    }

    /// Deletes a user's identity using the service key.
    ///
    /// A 404 counts as success: the identity is already gone, and the caller
    /// only cares that it no longer exists.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let response = self
            .client
            .delete(format!("{}/admin/users/{user_id}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
            .send()
            .await?;

        let status = response.status().as_u16();

        if deletion_succeeded(status) {
            if status == 404 {
                warn!("Identity for user {} was already deleted", user_id);
            }
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(AuthError::Api { status, message })
    }
}

/// A deletion is settled once the provider removed the identity or never
/// had it in the first place.
fn deletion_succeeded(status: u16) -> bool {
    (200..300).contains(&status) || status == 404
}

/// Resolves the caller's identity from the request headers.
///
/// Every authenticated handler calls this first; admin handlers follow it
/// with the role check. Missing header or unresolvable token rejects 401.
pub async fn authenticate(auth: &AuthClient, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    Ok(auth.resolve_user(token).await?)
}

/// Pulls the bearer token out of the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_trims_whitespace() {
        let headers = headers_with_auth("Bearer   abc123  ");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_auth("Basic abc123");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_deletion_succeeded_on_2xx() {
        assert!(deletion_succeeded(200));
        assert!(deletion_succeeded(204));
    }

    #[test]
    fn test_deletion_succeeded_on_missing_identity() {
        assert!(deletion_succeeded(404));
    }

    #[test]
    fn test_deletion_failed_on_other_statuses() {
        assert!(!deletion_succeeded(401));
        assert!(!deletion_succeeded(500));
    }
}
