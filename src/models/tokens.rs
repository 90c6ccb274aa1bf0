// SPDX-License-Identifier: MIT

//! Session token models.

use serde::{Deserialize, Serialize};

/// Supabase session token pair.
///
/// Rotated as a pair on every successful refresh; the two halves are never
/// updated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token lifecycle states.
///
/// Expiry of the access token is not a state of its own: every session
/// establishment refreshes the pair, and an expired access token only
/// surfaces as a rotation during that refresh. `Invalid` is terminal until
/// a new pair arrives through the token-injection ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token pair has ever been stored.
    NoSession,
    /// A token pair is stored and was accepted the last time it was used.
    Authenticated,
    /// The refresh token was rejected; re-login required.
    Invalid,
}
