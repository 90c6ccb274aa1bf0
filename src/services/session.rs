// SPDX-License-Identifier: MIT

//! Token lifecycle manager.
//!
//! Owns the stored session token pair and its lifecycle state. Every sync
//! attempt goes through [`SessionManager::establish`], which rotates the
//! pair against the auth service and persists the rotated pair before
//! anything else can fail.

use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::models::{SessionState, SessionTokens};
use crate::store::StateStore;
use crate::supabase::AuthClient;

/// An established session: the resolved identity plus the (possibly
/// rotated) token pair, already persisted.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub user_id: String,
    pub tokens: SessionTokens,
}

/// Manages the session token pair and its state transitions.
pub struct SessionManager {
    store: Arc<dyn StateStore>,
    auth: Arc<dyn AuthClient>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(store: Arc<dyn StateStore>, auth: Arc<dyn AuthClient>) -> Self {
        Self {
            store,
            auth,
            state: SessionState::NoSession,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token injection from the originating website.
    ///
    /// Moves `NoSession` or `Invalid` to `Authenticated` and persists the
    /// pair. An existing pair is replaced wholesale.
    pub async fn store_tokens(&mut self, tokens: SessionTokens) -> Result<()> {
        self.store.set_session_tokens(&tokens).await?;
        self.state = SessionState::Authenticated;
        tracing::info!("Session tokens stored from website login");
        Ok(())
    }

    /// Establish a session for one sync attempt.
    ///
    /// Loads the stored pair, refreshes it against the auth service
    /// (rotating both tokens), persists the rotated pair before any further
    /// remote call, then resolves the authenticated user's identity.
    pub async fn establish(&mut self) -> Result<EstablishedSession> {
        let Some(stored) = self.store.session_tokens().await? else {
            if self.state != SessionState::Invalid {
                self.state = SessionState::NoSession;
            }
            return Err(SyncError::Unauthenticated);
        };

        let rotated = match self.auth.refresh_session(&stored.refresh_token).await {
            Ok(pair) => pair,
            Err(SyncError::AuthExpired) => {
                // Refresh tokens are single-use; a rejected pair is dead.
                // Clear it so only a fresh login can leave `Invalid`.
                self.state = SessionState::Invalid;
                self.store.clear_session_tokens().await?;
                tracing::warn!("Refresh token rejected, stored session cleared");
                return Err(SyncError::AuthExpired);
            }
            Err(e) => return Err(e),
        };

        // The rotated pair must be persisted before any later step runs:
        // the old refresh token is already consumed at this point.
        self.store.set_session_tokens(&rotated).await?;
        self.state = SessionState::Authenticated;
        tracing::debug!("Session refreshed, rotated tokens persisted");

        let user_id = self.auth.current_user(&rotated.access_token).await?;

        Ok(EstablishedSession {
            user_id,
            tokens: rotated,
        })
    }
}
