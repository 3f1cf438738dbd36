/**
 * Server Initialization
 *
 * 1. Pick the stores: PostgreSQL when `DATABASE_URL` connects, otherwise the
 *    in-memory store
 * 2. Build `AppState`
 * 3. Build the router
 * 4. Start the periodic topic cleanup task
 *
 * A missing or unreachable database never stops startup.
 */

use std::time::Duration;

use axum::Router;

use crate::backend::realtime::NotificationHub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::shutdown::Shutdown;
use crate::backend::server::state::AppState;
use crate::backend::store::Stores;

/// Build application state from configuration
pub async fn build_state(config: &ServerConfig) -> AppState {
    let stores = match load_database(config).await {
        Some(pool) => {
            tracing::info!("Using PostgreSQL store");
            Stores::postgres(pool)
        }
        None => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Stores::in_memory()
        }
    };
    AppState::new(config, stores)
}

/// Build the router and start background tasks
pub fn create_app(state: AppState, config: &ServerConfig) -> Router<()> {
    spawn_topic_cleanup(state.hub.clone(), config.topic_cleanup, state.shutdown.clone());
    let app = create_router(state);
    tracing::info!("Router configured with periodic topic cleanup");
    app
}

/// Prune topics without subscribers every `period` until shutdown
pub fn spawn_topic_cleanup(
    hub: NotificationHub,
    period: Duration,
    shutdown: Shutdown,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = hub.cleanup_inactive_topics();
                    tracing::debug!("[Hub] Cleaned up {} inactive topics", removed);
                }
                _ = shutdown.wait() => break,
            }
        }
    })
}
