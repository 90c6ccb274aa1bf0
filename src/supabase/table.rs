// SPDX-License-Identifier: MIT

//! PostgREST client for the `daily_usage` table.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::models::DailyUsage;
use crate::supabase::tables;

/// Remote table seam.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Insert the row, or overwrite the existing row sharing
    /// `(user_id, date)`. Returns the row as persisted remotely.
    async fn upsert_daily_usage(
        &self,
        access_token: &str,
        row: &DailyUsage,
    ) -> Result<DailyUsage, SyncError>;
}

/// PostgREST table client backed by reqwest.
#[derive(Clone)]
pub struct SupabaseTable {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseTable {
    /// Create a client for the project's REST endpoint.
    pub fn new(project_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }
}

#[async_trait]
impl TableClient for SupabaseTable {
    async fn upsert_daily_usage(
        &self,
        access_token: &str,
        row: &DailyUsage,
    ) -> Result<DailyUsage, SyncError> {
        let url = format!(
            "{}/{}?on_conflict=user_id,date",
            self.base_url,
            tables::DAILY_USAGE
        );

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| SyncError::RemotePersist(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::RemotePersist(format!("HTTP {status}: {body}")));
        }

        // return=representation yields the affected rows as an array.
        let mut rows: Vec<DailyUsage> = response
            .json()
            .await
            .map_err(|e| SyncError::RemotePersist(format!("bad upsert response: {e}")))?;

        rows.pop()
            .ok_or_else(|| SyncError::RemotePersist("upsert returned no rows".to_string()))
    }
}
