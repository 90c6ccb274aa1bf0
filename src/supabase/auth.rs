// SPDX-License-Identifier: MIT

//! Supabase GoTrue client: refresh-token rotation and identity lookup.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SyncError;
use crate::models::SessionTokens;

/// Remote auth service seam.
///
/// A rejected refresh token surfaces as [`SyncError::AuthExpired`]; any
/// other refresh fault is a generic sync failure. Identity lookup failures
/// surface as [`SyncError::IdentityUnavailable`].
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Exchange the stored refresh token for a rotated token pair.
    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, SyncError>;

    /// Resolve the authenticated user's id.
    async fn current_user(&self, access_token: &str) -> Result<String, SyncError>;
}

/// GoTrue auth client backed by reqwest.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    /// Create a client for the project's auth endpoint.
    pub fn new(project_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }
}

/// Response body of `POST /auth/v1/token?grant_type=refresh_token`.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

/// Response body of `GET /auth/v1/user`.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

#[async_trait]
impl AuthClient for SupabaseAuth {
    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, SyncError> {
        let url = format!("{}/token?grant_type=refresh_token", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| SyncError::failed(format!("token refresh request failed: {e}")))?;

        let status = response.status();
        // GoTrue answers 400/401 for a revoked or already-used refresh
        // token. Anything else (429, 5xx) is not a rejection.
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
        {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Refresh token rejected");
            return Err(SyncError::AuthExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::failed(format!(
                "auth service error: HTTP {status}: {body}"
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| SyncError::failed(format!("bad refresh response: {e}")))?;

        Ok(SessionTokens {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
        })
    }

    async fn current_user(&self, access_token: &str) -> Result<String, SyncError> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SyncError::IdentityUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::IdentityUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| SyncError::IdentityUnavailable(format!("bad user response: {e}")))?;

        Ok(user.id)
    }
}
