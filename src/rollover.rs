// SPDX-License-Identifier: MIT

//! Rollover detector: decides when a day boundary has been crossed and
//! drives the flush-then-reset sequence.
//!
//! Runs in its own task with no shared state; all coordination with the
//! sync worker goes over the message channel.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::time::Duration;

use crate::channel::SyncHandle;
use crate::error::StoreError;
use crate::models::DailyFlush;
use crate::store::StateStore;

pub struct RolloverDetector {
    store: Arc<dyn StateStore>,
    sync: SyncHandle,
    sync_deadline: Duration,
}

impl RolloverDetector {
    pub fn new(store: Arc<dyn StateStore>, sync: SyncHandle, sync_deadline: Duration) -> Self {
        Self {
            store,
            sync,
            sync_deadline,
        }
    }

    /// Run one rollover check against the local calendar date.
    pub async fn check_and_rollover(&self) {
        self.check_on(Local::now().date_naive()).await
    }

    /// Run one rollover check as of `today`.
    ///
    /// Counters are reset only strictly after the closing day's upsert is
    /// confirmed. On any failure local state stays untouched; the next
    /// check is the only retry. Running twice after a successful rollover
    /// is a no-op the second time.
    pub async fn check_on(&self, today: NaiveDate) {
        if let Err(error) = self.try_check(today).await {
            tracing::error!(%error, "Rollover check could not access local state");
        }
    }

    async fn try_check(&self, today: NaiveDate) -> Result<(), StoreError> {
        let Some(stored) = self.store.last_active_date().await? else {
            // First run: start accumulating under today's date.
            tracing::info!(%today, "First run, initializing active date");
            return self.store.touch(today).await;
        };

        if stored == today {
            // Same day: idempotent touch, counters keep accumulating.
            return self.store.touch(today).await;
        }

        let snapshot = self.store.usage_snapshot().await?;
        let flush = DailyFlush {
            date: stored,
            snapshot,
        };
        tracing::info!(closing = %stored, %today, "Day boundary crossed, flushing counters");

        match self.sync.sync_daily_usage(flush, self.sync_deadline).await {
            Ok(row) => {
                tracing::info!(
                    user_id = %row.user_id,
                    date = %row.date,
                    "Sync confirmed, resetting counters"
                );
                self.store.complete_rollover(today).await
            }
            Err(error) => {
                // No reset: the counters stay until a later check flushes
                // them successfully.
                tracing::warn!(%error, closing = %stored, "Sync failed, keeping counters");
                Ok(())
            }
        }
    }
}
