/**
 * Record Store Loading
 *
 * Picks the record store from the server configuration:
 *
 * - `database_url` set: connect a PostgreSQL pool and run the embedded
 *   migrations from `migrations/`
 * - `database_url` unset: an empty in-memory store
 *
 * # Error Handling
 *
 * A configured database that cannot be reached or migrated stops startup.
 * Falling back to the in-memory store there would accept writes that are
 * lost on restart.
 */

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::backend::store::{PgStore, RecordStore, StoreError};
use crate::shared::ServerConfig;

/// Pool size for the PostgreSQL store
const MAX_CONNECTIONS: u32 = 10;

/// Load the record store described by `config`
///
/// # Example
///
/// ```rust,no_run
/// use taskboard::backend::server::config::load_store;
/// use taskboard::shared::ServerConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = load_store(&ServerConfig::default()).await?;
/// assert_eq!(store.backend_name(), "memory");
/// # Ok(())
/// # }
/// ```
pub async fn load_store(config: &ServerConfig) -> Result<RecordStore, StoreError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data is lost on restart.");
        return Ok(RecordStore::memory());
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            StoreError::from(e)
        })?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        StoreError::Database(e.into())
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(RecordStore::Postgres(PgStore::new(pool)))
}
