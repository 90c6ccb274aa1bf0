// SPDX-License-Identifier: MIT

//! Supabase client wrappers (GoTrue auth + PostgREST).

pub mod auth;
pub mod table;

pub use auth::{AuthClient, SupabaseAuth};
pub use table::{SupabaseTable, TableClient};

/// Remote table names.
pub mod tables {
    pub const DAILY_USAGE: &str = "daily_usage";
}
