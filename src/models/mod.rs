// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod tokens;
pub mod usage;

pub use tokens::{SessionState, SessionTokens};
pub use usage::{DailyFlush, DailyUsage, Platform, UsageSnapshot};
