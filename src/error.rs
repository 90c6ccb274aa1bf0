// SPDX-License-Identifier: MIT

//! Application error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of one rollover-sync attempt.
///
/// Every fault inside the sync coordinator is converted into one of these
/// before it crosses the message channel boundary; the rollover detector
/// never observes a panic or a raw transport error.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No session tokens are stored; the user has never logged in
    /// (or the stored pair was cleared after a rejected refresh).
    #[error("not authenticated: no stored session tokens")]
    Unauthenticated,

    /// The auth service rejected the stored refresh token.
    #[error("session expired: refresh token rejected")]
    AuthExpired,

    /// Session is valid but the user identity could not be resolved.
    #[error("identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// The remote store rejected the upsert.
    #[error("remote persist failed: {0}")]
    RemotePersist(String),

    /// Message channel delivery failure (receiver gone, deadline expired).
    #[error("transport error: {0}")]
    Transport(String),

    /// Catch-all for unexpected faults during a sync attempt.
    #[error("sync failed: {0}")]
    SyncFailed(String),
}

impl SyncError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        SyncError::Transport(msg.into())
    }

    /// Create a generic sync failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        SyncError::SyncFailed(msg.into())
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        SyncError::SyncFailed(format!("state store: {err}"))
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::SyncFailed(err.to_string())
    }
}

/// Local state store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// JSON error response body for the ingress API.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "State store error");
        let body = ErrorResponse {
            error: "store_error".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
