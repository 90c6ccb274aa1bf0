// SPDX-License-Identifier: MIT

//! Shared fakes and builders for the rollover/sync tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use llm_usage_tracker::channel::{sync_channel, SyncHandle};
use llm_usage_tracker::error::{StoreError, SyncError};
use llm_usage_tracker::models::{
    DailyFlush, DailyUsage, Platform, SessionTokens, UsageSnapshot,
};
use llm_usage_tracker::services::{run_sync_worker, SessionManager, SyncCoordinator};
use llm_usage_tracker::store::StateStore;
use llm_usage_tracker::supabase::{AuthClient, TableClient};

// ─── Builders ────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 120 s and 4 prompts on ChatGPT, nothing else.
#[allow(dead_code)]
pub fn sample_snapshot() -> UsageSnapshot {
    let mut snapshot = UsageSnapshot::default();
    snapshot.record(Platform::Chatgpt, 120, 4);
    snapshot
}

#[allow(dead_code)]
pub fn sample_flush(closing: NaiveDate) -> DailyFlush {
    DailyFlush {
        date: closing,
        snapshot: sample_snapshot(),
    }
}

#[allow(dead_code)]
pub fn tokens(access: &str, refresh: &str) -> SessionTokens {
    SessionTokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

// ─── In-memory state store ───────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStateStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_active_date: Option<NaiveDate>,
    usage: UsageSnapshot,
    session_tokens: Option<SessionTokens>,
}

#[allow(dead_code)]
impl MemoryStateStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed_date(&self, date: NaiveDate) {
        self.inner.lock().await.last_active_date = Some(date);
    }

    pub async fn seed_usage(&self, usage: UsageSnapshot) {
        self.inner.lock().await.usage = usage;
    }

    pub async fn seed_tokens(&self, tokens: SessionTokens) {
        self.inner.lock().await.session_tokens = Some(tokens);
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn last_active_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.inner.lock().await.last_active_date)
    }

    async fn touch(&self, date: NaiveDate) -> Result<(), StoreError> {
        self.inner.lock().await.last_active_date = Some(date);
        Ok(())
    }

    async fn usage_snapshot(&self) -> Result<UsageSnapshot, StoreError> {
        Ok(self.inner.lock().await.usage)
    }

    async fn record_usage(
        &self,
        platform: Platform,
        seconds: u64,
        prompts: u64,
    ) -> Result<(), StoreError> {
        self.inner.lock().await.usage.record(platform, seconds, prompts);
        Ok(())
    }

    async fn complete_rollover(&self, date: NaiveDate) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;
        state.usage = UsageSnapshot::default();
        state.last_active_date = Some(date);
        Ok(())
    }

    async fn session_tokens(&self) -> Result<Option<SessionTokens>, StoreError> {
        Ok(self.inner.lock().await.session_tokens.clone())
    }

    async fn set_session_tokens(&self, tokens: &SessionTokens) -> Result<(), StoreError> {
        self.inner.lock().await.session_tokens = Some(tokens.clone());
        Ok(())
    }

    async fn clear_session_tokens(&self) -> Result<(), StoreError> {
        self.inner.lock().await.session_tokens = None;
        Ok(())
    }
}

// ─── Fake auth client ────────────────────────────────────────────────────

pub struct FakeAuthClient {
    pub refresh_calls: AtomicUsize,
    pub user_calls: AtomicUsize,
    reject_refresh: bool,
    fail_identity: bool,
    rotated: SessionTokens,
    user_id: String,
}

#[allow(dead_code)]
impl FakeAuthClient {
    fn base() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
            reject_refresh: false,
            fail_identity: false,
            rotated: tokens("rotated-access", "rotated-refresh"),
            user_id: "user-1".to_string(),
        }
    }

    /// Accepts the refresh and resolves the identity.
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::base())
    }

    /// Rejects the refresh token.
    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject_refresh: true,
            ..Self::base()
        })
    }

    /// Accepts the refresh but cannot resolve the identity.
    pub fn identity_failing() -> Arc<Self> {
        Arc::new(Self {
            fail_identity: true,
            ..Self::base()
        })
    }

    pub fn rotated_pair(&self) -> SessionTokens {
        self.rotated.clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn user_count(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthClient for FakeAuthClient {
    async fn refresh_session(&self, _refresh_token: &str) -> Result<SessionTokens, SyncError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_refresh {
            return Err(SyncError::AuthExpired);
        }
        Ok(self.rotated.clone())
    }

    async fn current_user(&self, _access_token: &str) -> Result<String, SyncError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_identity {
            return Err(SyncError::IdentityUnavailable(
                "user lookup unavailable".to_string(),
            ));
        }
        Ok(self.user_id.clone())
    }
}

// ─── Fake table client ───────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeTableClient {
    pub upsert_calls: AtomicUsize,
    fail_upserts: bool,
    rows: Mutex<HashMap<(String, NaiveDate), DailyUsage>>,
}

#[allow(dead_code)]
impl FakeTableClient {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_upserts: true,
            ..Self::default()
        })
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn row(&self, user_id: &str, date: NaiveDate) -> Option<DailyUsage> {
        self.rows
            .lock()
            .await
            .get(&(user_id.to_string(), date))
            .cloned()
    }
}

#[async_trait]
impl TableClient for FakeTableClient {
    async fn upsert_daily_usage(
        &self,
        _access_token: &str,
        row: &DailyUsage,
    ) -> Result<DailyUsage, SyncError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts {
            return Err(SyncError::RemotePersist("row rejected".to_string()));
        }
        // Unique on (user_id, date): a colliding key overwrites in place.
        self.rows
            .lock()
            .await
            .insert((row.user_id.clone(), row.date), row.clone());
        Ok(row.clone())
    }
}

// ─── Wiring helpers ──────────────────────────────────────────────────────

/// Build a coordinator over the given fakes.
#[allow(dead_code)]
pub fn test_coordinator(
    store: Arc<MemoryStateStore>,
    auth: Arc<FakeAuthClient>,
    table: Arc<FakeTableClient>,
) -> SyncCoordinator {
    SyncCoordinator::new(SessionManager::new(store, auth), table)
}

/// Spawn a live sync worker and return the sending handle.
#[allow(dead_code)]
pub fn spawn_worker(
    store: Arc<MemoryStateStore>,
    auth: Arc<FakeAuthClient>,
    table: Arc<FakeTableClient>,
) -> SyncHandle {
    let (handle, rx) = sync_channel(8);
    tokio::spawn(run_sync_worker(rx, test_coordinator(store, auth, table)));
    handle
}
