// SPDX-License-Identifier: MIT

//! Usage instrumentation ingress.
//!
//! Browser-side instrumentation reports usage increments here; the daemon
//! only accumulates what is reported.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{Platform, UsageSnapshot};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/events/usage", post(record_usage))
        .route("/v1/usage", get(current_usage))
}

/// One reported usage increment.
#[derive(Debug, Deserialize)]
pub struct UsageEvent {
    pub platform: Platform,
    #[serde(default)]
    pub seconds: u64,
    #[serde(default)]
    pub prompts: u64,
}

/// Live counter state.
#[derive(Serialize)]
pub struct UsageView {
    pub last_active_date: Option<NaiveDate>,
    pub usage: UsageSnapshot,
}

async fn record_usage(
    State(state): State<Arc<AppState>>,
    Json(event): Json<UsageEvent>,
) -> Result<StatusCode, StoreError> {
    state
        .store
        .record_usage(event.platform, event.seconds, event.prompts)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn current_usage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsageView>, StoreError> {
    Ok(Json(UsageView {
        last_active_date: state.store.last_active_date().await?,
        usage: state.store.usage_snapshot().await?,
    }))
}
