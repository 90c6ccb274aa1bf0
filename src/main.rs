// SPDX-License-Identifier: MIT

//! llm-usage-tracker daemon
//!
//! Tracks daily LLM usage counters locally and syncs each closing day to a
//! Supabase `daily_usage` row before resetting the counters.

use std::sync::Arc;
use std::time::Duration;

use llm_usage_tracker::{
    channel::sync_channel,
    config::Config,
    rollover::RolloverDetector,
    services::{run_sync_worker, SessionManager, SyncCoordinator},
    store::{JsonStateStore, StateStore},
    supabase::{SupabaseAuth, SupabaseTable},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting llm-usage-tracker");

    // Open the local state file
    let store: Arc<dyn StateStore> = Arc::new(
        JsonStateStore::open(&config.state_path).expect("Failed to open state file"),
    );
    tracing::info!(path = %config.state_path.display(), "State store opened");

    // Supabase clients
    let auth = Arc::new(SupabaseAuth::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let table = Arc::new(SupabaseTable::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    ));

    // Sync worker in its own task, reached only through the channel
    let (sync, rx) = sync_channel(16);
    let session = SessionManager::new(store.clone(), auth);
    let coordinator = SyncCoordinator::new(session, table);
    tokio::spawn(run_sync_worker(rx, coordinator));

    // Rollover check at startup, then on an interval; a failed sync is
    // retried by whichever check runs next.
    let detector = RolloverDetector::new(
        store.clone(),
        sync.clone(),
        Duration::from_secs(config.sync_timeout_secs),
    );
    detector.check_and_rollover().await;

    let interval_secs = config.rollover_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.tick().await; // first tick fires immediately, already checked above
        loop {
            interval.tick().await;
            detector.check_and_rollover().await;
        }
    });

    // Ingress API on loopback only
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sync,
    });
    let app = llm_usage_tracker::routes::create_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Ingress API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("llm_usage_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
