// SPDX-License-Identifier: MIT

//! Local state persistence layer.

pub mod json;

pub use json::JsonStateStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Platform, SessionTokens, UsageSnapshot};

/// Local persistent state behind the rollover/sync core.
///
/// Individual operations are atomic; there are no multi-key transactions
/// beyond [`complete_rollover`](StateStore::complete_rollover), which must
/// apply the counter reset and the date advance as a single write so that
/// counters are never zeroed without the date moving with them.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// The day whose counters are currently accumulating, if any.
    async fn last_active_date(&self) -> Result<Option<NaiveDate>, StoreError>;

    /// Mark activity for `date` without touching counters.
    async fn touch(&self, date: NaiveDate) -> Result<(), StoreError>;

    /// Current value of all six counters.
    async fn usage_snapshot(&self) -> Result<UsageSnapshot, StoreError>;

    /// Accumulate reported usage for one platform.
    async fn record_usage(
        &self,
        platform: Platform,
        seconds: u64,
        prompts: u64,
    ) -> Result<(), StoreError>;

    /// Zero all six counters and advance `last_active_date` to `date` in one
    /// write. Called only after the closing day's upsert is confirmed.
    async fn complete_rollover(&self, date: NaiveDate) -> Result<(), StoreError>;

    /// The stored session token pair, if the user has logged in.
    async fn session_tokens(&self) -> Result<Option<SessionTokens>, StoreError>;

    /// Replace the stored token pair.
    async fn set_session_tokens(&self, tokens: &SessionTokens) -> Result<(), StoreError>;

    /// Drop the stored token pair (rejected refresh).
    async fn clear_session_tokens(&self) -> Result<(), StoreError>;
}
