/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Load the record store (PostgreSQL or in-memory)
 * 2. Build the application state
 * 3. Create the router
 * 4. Start the periodic cleanup of idle scope locks
 */

use std::time::Duration;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::{RecordStore, StoreError};
use crate::shared::ServerConfig;

/// How often unused scope locks are dropped
const LOCK_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when a configured database cannot be connected or migrated.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, StoreError> {
    tracing::info!("Initializing taskboard server");

    let store = load_store(&config).await?;
    tracing::info!("Record store ready ({})", store.backend_name());

    Ok(build_app(store, config))
}

/// Router over an already loaded store
///
/// Must be called inside a Tokio runtime; it spawns the lock cleanup task.
pub fn build_app(store: RecordStore, config: ServerConfig) -> Router<()> {
    let app_state = AppState::new(store, config);
    let app = create_router(app_state.clone());

    let locks = app_state.scope_locks.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LOCK_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = locks.cleanup_idle();
            if removed > 0 {
                tracing::debug!("Dropped {} idle scope locks", removed);
            }
        }
    });

    tracing::info!("Router configured with periodic cleanup task");
    app
}
