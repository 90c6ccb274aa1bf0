// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL (e.g. `https://xyzcompany.supabase.co`)
    pub supabase_url: String,
    /// Supabase anon key (public API key)
    pub supabase_anon_key: String,
    /// Origin of the website that hands over session tokens after login
    pub website_origin: String,
    /// Path of the local JSON state file
    pub state_path: PathBuf,
    /// Loopback port for the ingress API
    pub port: u16,
    /// Deadline for one sync request/response round trip, in seconds
    pub sync_timeout_secs: u64,
    /// Interval between rollover checks, in seconds
    pub rollover_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            supabase_url: "https://test-project.supabase.co".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            website_origin: "https://app.example.com".to_string(),
            state_path: PathBuf::from("usage-state.json"),
            port: 4789,
            sync_timeout_secs: 30,
            rollover_interval_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            website_origin: env::var("WEBSITE_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            state_path: env::var("TRACKER_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("usage-state.json")),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4789".to_string())
                .parse()
                .unwrap_or(4789),
            sync_timeout_secs: env::var("SYNC_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rollover_interval_secs: env::var("ROLLOVER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
