//! Bearer-token verification against the hosted auth provider.
//!
//! Authentication is fully delegated: we forward the caller's token to the
//! provider's user-info endpoint (GoTrue-style `/auth/v1/user`) and trust
//! its answer. No sessions, no token parsing, no credential storage here.

use axum::http::HeaderMap;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use docchat_core::config::AuthConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid or expired token")]
    Unauthorized,

    #[error("auth provider error: {0}")]
    Provider(String),
}

/// The authenticated caller, as reported by the auth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    /// Build from config; None when the auth provider is not configured.
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        let (url, anon_key) = (config.url.as_ref()?, config.anon_key.as_ref()?);
        Some(Self {
            client: Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.clone(),
        })
    }

    /// Verify a bearer token and return the user it belongs to.
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AuthError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!("{status}: {body}")));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("unexpected user payload: {e}")))?;
        Ok(user)
    }
}

/// Extract the bearer token from an Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn empty_token_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
