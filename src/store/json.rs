// SPDX-License-Identifier: MIT

//! JSON-file implementation of the state store.
//!
//! The whole state fits in one small document, so the store keeps it in
//! memory under a mutex and rewrites the file on every mutation via a temp
//! file + rename, so a crash mid-write never leaves a truncated state file.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{Platform, SessionTokens, UsageSnapshot};
use crate::store::StateStore;

/// On-disk state document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    last_active_date: Option<NaiveDate>,
    #[serde(default)]
    usage: UsageSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_tokens: Option<SessionTokens>,
}

/// File-backed state store.
pub struct JsonStateStore {
    path: PathBuf,
    state: Mutex<PersistedState>,
}

impl JsonStateStore {
    /// Open the store, starting from an empty state if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Mutate the state under the lock and persist the result.
    async fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let mut state = self.state.lock().await;
        mutate(&mut state);
        self.persist(&state)
    }

    fn persist(&self, state: &PersistedState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn last_active_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.state.lock().await.last_active_date)
    }

    async fn touch(&self, date: NaiveDate) -> Result<(), StoreError> {
        self.update(|s| s.last_active_date = Some(date)).await
    }

    async fn usage_snapshot(&self) -> Result<UsageSnapshot, StoreError> {
        Ok(self.state.lock().await.usage)
    }

    async fn record_usage(
        &self,
        platform: Platform,
        seconds: u64,
        prompts: u64,
    ) -> Result<(), StoreError> {
        self.update(|s| s.usage.record(platform, seconds, prompts))
            .await
    }

    async fn complete_rollover(&self, date: NaiveDate) -> Result<(), StoreError> {
        self.update(|s| {
            s.usage = UsageSnapshot::default();
            s.last_active_date = Some(date);
        })
        .await
    }

    async fn session_tokens(&self) -> Result<Option<SessionTokens>, StoreError> {
        Ok(self.state.lock().await.session_tokens.clone())
    }

    async fn set_session_tokens(&self, tokens: &SessionTokens) -> Result<(), StoreError> {
        self.update(|s| s.session_tokens = Some(tokens.clone()))
            .await
    }

    async fn clear_session_tokens(&self) -> Result<(), StoreError> {
        self.update(|s| s.session_tokens = None).await
    }
}
