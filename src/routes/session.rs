// SPDX-License-Identifier: MIT

//! Token-injection ingress from the originating website.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::SessionTokens;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/v1/session/tokens", post(store_tokens))
}

/// Token pair posted by the website after login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHandoff {
    pub access_token: String,
    pub refresh_token: String,
}

/// Forward the pair to the sync worker, fire-and-forget.
async fn store_tokens(
    State(state): State<Arc<AppState>>,
    Json(handoff): Json<TokenHandoff>,
) -> StatusCode {
    state
        .sync
        .store_tokens(SessionTokens {
            access_token: handoff.access_token,
            refresh_token: handoff.refresh_token,
        })
        .await;
    StatusCode::ACCEPTED
}
