// SPDX-License-Identifier: MIT

//! Origin validation for browser-originated token handoffs.
//!
//! The analog of the original cross-context event check: a token pair is
//! only trusted when the posting page belongs to the configured website.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::AppState;

/// Reject requests whose `Origin` header is missing or not the configured
/// website origin (localhost is allowed for development).
pub async fn require_website_origin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    if !origin_allowed(origin, &state.config.website_origin) {
        tracing::warn!(origin = origin.unwrap_or("<none>"), "Rejected token handoff");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

fn origin_allowed(origin: Option<&str>, website_origin: &str) -> bool {
    match origin {
        Some(o) => {
            o == website_origin
                || o.starts_with("http://localhost")
                || o.starts_with("http://127.0.0.1")
        }
        None => false,
    }
}
