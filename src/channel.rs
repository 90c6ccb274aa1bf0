// SPDX-License-Identifier: MIT

//! Message channel between the rollover detector, the ingress routes and
//! the sync worker.
//!
//! Delivery is at-most-once: a closed channel, a dropped responder or an
//! expired deadline is a transport failure, never a retry.

use tokio::sync::{mpsc, oneshot};
use tokio::time::Duration;

use crate::error::{Result, SyncError};
use crate::models::{DailyFlush, DailyUsage, SessionTokens};

/// Messages handled by the sync worker.
#[derive(Debug)]
pub enum SyncMessage {
    /// Fire-and-forget token injection from the originating website.
    StoreTokens { tokens: SessionTokens },

    /// Request/response: flush one day's counters to the remote table.
    /// The responder is resolved exactly once.
    SyncDailyUsage {
        flush: DailyFlush,
        respond_to: oneshot::Sender<Result<DailyUsage>>,
    },
}

/// Sending half of the sync channel.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncMessage>,
}

impl SyncHandle {
    /// Hand a fresh token pair to the sync worker.
    ///
    /// Fire-and-forget: a closed channel is logged and the pair dropped.
    pub async fn store_tokens(&self, tokens: SessionTokens) {
        if self
            .tx
            .send(SyncMessage::StoreTokens { tokens })
            .await
            .is_err()
        {
            tracing::warn!("Sync worker gone, token injection dropped");
        }
    }

    /// Ask the worker to flush one day's counters and await the single
    /// response, bounded by `deadline`.
    pub async fn sync_daily_usage(
        &self,
        flush: DailyFlush,
        deadline: Duration,
    ) -> Result<DailyUsage> {
        let (respond_to, response) = oneshot::channel();
        self.tx
            .send(SyncMessage::SyncDailyUsage { flush, respond_to })
            .await
            .map_err(|_| SyncError::transport("sync worker unavailable"))?;

        match tokio::time::timeout(deadline, response).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SyncError::transport("sync worker dropped the request")),
            Err(_) => Err(SyncError::transport(format!(
                "no sync response within {}s",
                deadline.as_secs()
            ))),
        }
    }
}

/// Create the sync channel; the receiver side goes to
/// [`run_sync_worker`](crate::services::run_sync_worker).
pub fn sync_channel(buffer: usize) -> (SyncHandle, mpsc::Receiver<SyncMessage>) {
    let (tx, rx) = mpsc::channel(buffer);
    (SyncHandle { tx }, rx)
}
