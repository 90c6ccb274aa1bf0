// SPDX-License-Identifier: MIT

//! LLM usage tracker daemon.
//!
//! Accumulates per-platform usage counters (active seconds and prompt
//! counts for ChatGPT, Claude and Perplexity) reported by browser
//! instrumentation, and at each day boundary flushes them to a per-user,
//! per-date row of a Supabase `daily_usage` table before resetting them.

pub mod channel;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rollover;
pub mod routes;
pub mod services;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use channel::SyncHandle;
use config::Config;
use store::StateStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn StateStore>,
    pub sync: SyncHandle,
}
