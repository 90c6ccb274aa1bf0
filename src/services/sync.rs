// SPDX-License-Identifier: MIT

//! Sync coordinator: performs one daily flush to the remote table.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::channel::SyncMessage;
use crate::error::Result;
use crate::models::{DailyFlush, DailyUsage};
use crate::services::SessionManager;
use crate::supabase::TableClient;

/// Orchestrates rollover-sync attempts, one at a time to completion.
pub struct SyncCoordinator {
    session: SessionManager,
    table: Arc<dyn TableClient>,
}

impl SyncCoordinator {
    pub fn new(session: SessionManager, table: Arc<dyn TableClient>) -> Self {
        Self { session, table }
    }

    /// The token lifecycle manager owned by this coordinator.
    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// Flush one day's counters to the remote `daily_usage` row.
    ///
    /// Establishes a session (persisting any token rotation regardless of
    /// what happens afterwards), resolves the user, and upserts the row
    /// keyed by `(user_id, closing date)`. Every failure comes back as a
    /// structured [`SyncError`](crate::error::SyncError).
    pub async fn handle_daily_sync(&mut self, flush: DailyFlush) -> Result<DailyUsage> {
        let session = self.session.establish().await?;

        let row = DailyUsage::from_flush(&session.user_id, &flush, Utc::now());
        let persisted = self
            .table
            .upsert_daily_usage(&session.tokens.access_token, &row)
            .await?;

        tracing::info!(
            user_id = %persisted.user_id,
            date = %persisted.date,
            "Daily usage synced"
        );
        Ok(persisted)
    }
}

/// Drive the sync side of the message channel.
///
/// Messages are processed strictly one at a time; the loop ends when every
/// sender handle is gone.
pub async fn run_sync_worker(mut rx: mpsc::Receiver<SyncMessage>, mut coordinator: SyncCoordinator) {
    while let Some(message) = rx.recv().await {
        match message {
            SyncMessage::StoreTokens { tokens } => {
                if let Err(error) = coordinator.session_mut().store_tokens(tokens).await {
                    tracing::warn!(%error, "Failed to store injected tokens");
                }
            }
            SyncMessage::SyncDailyUsage { flush, respond_to } => {
                let result = coordinator.handle_daily_sync(flush).await;
                if let Err(ref error) = result {
                    tracing::warn!(%error, date = %flush.date, "Daily sync failed");
                }
                if respond_to.send(result).is_err() {
                    tracing::warn!("Sync requester gone before response could be sent");
                }
            }
        }
    }
}
