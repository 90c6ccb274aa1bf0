// SPDX-License-Identifier: MIT

//! Usage counter models shared by the state store, the message channel and
//! the remote `daily_usage` table.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Tracked LLM platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Chatgpt,
    Claude,
    Perplexity,
}

/// The six usage counters accumulating for the current day.
///
/// A copy of this struct, captured at the moment a rollover is detected, is
/// the immutable payload sent to the sync coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Active seconds per platform.
    #[serde(default)]
    pub chatgpt_seconds: u64,
    #[serde(default)]
    pub claude_seconds: u64,
    #[serde(default)]
    pub perplexity_seconds: u64,

    /// Prompts submitted per platform.
    #[serde(default)]
    pub chatgpt_prompts: u64,
    #[serde(default)]
    pub claude_prompts: u64,
    #[serde(default)]
    pub perplexity_prompts: u64,
}

impl UsageSnapshot {
    /// True if no usage has been recorded at all.
    pub fn is_empty(&self) -> bool {
        *self == UsageSnapshot::default()
    }

    /// Add reported usage for one platform.
    pub fn record(&mut self, platform: Platform, seconds: u64, prompts: u64) {
        let (secs, count) = match platform {
            Platform::Chatgpt => (&mut self.chatgpt_seconds, &mut self.chatgpt_prompts),
            Platform::Claude => (&mut self.claude_seconds, &mut self.claude_prompts),
            Platform::Perplexity => (&mut self.perplexity_seconds, &mut self.perplexity_prompts),
        };
        *secs = secs.saturating_add(seconds);
        *count = count.saturating_add(prompts);
    }
}

/// Payload of a daily sync request: the counters being flushed and the
/// calendar day they accumulated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFlush {
    /// The day being closed out (the stored `last_active_date`).
    pub date: NaiveDate,
    pub snapshot: UsageSnapshot,
}

/// One row of the remote `daily_usage` table, unique on `(user_id, date)`.
///
/// An upsert with a colliding key overwrites the existing row in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub user_id: String,
    pub date: NaiveDate,
    pub chatgpt_seconds: u64,
    pub claude_seconds: u64,
    pub perplexity_seconds: u64,
    pub chatgpt_prompts: u64,
    pub claude_prompts: u64,
    pub perplexity_prompts: u64,
    pub updated_at: DateTime<Utc>,
}

impl DailyUsage {
    /// Build the row for a flush, attributed to the flush's closing day.
    pub fn from_flush(user_id: &str, flush: &DailyFlush, updated_at: DateTime<Utc>) -> Self {
        let s = flush.snapshot;
        Self {
            user_id: user_id.to_string(),
            date: flush.date,
            chatgpt_seconds: s.chatgpt_seconds,
            claude_seconds: s.claude_seconds,
            perplexity_seconds: s.perplexity_seconds,
            chatgpt_prompts: s.chatgpt_prompts,
            claude_prompts: s.claude_prompts,
            perplexity_prompts: s.perplexity_prompts,
            updated_at,
        }
    }
}
