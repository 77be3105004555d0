/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container, holding:
 * - The record store (PostgreSQL or in-memory)
 * - The token service used by the auth middleware and login handler
 * - The per-scope locks serializing rank changes
 * - The loaded server configuration
 *
 * Every field is cheap to clone: the store wraps a pool or an `Arc`, and the
 * lock registry and config are shared through `Arc`.
 *
 * # Example
 *
 * ```rust,no_run
 * use taskboard::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let boards = state.store.list_boards(uuid::Uuid::nil()).await;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenService;
use crate::backend::ordering::ScopeLocks;
use crate::backend::store::RecordStore;
use crate::shared::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Users, boards, columns and cards
    pub store: RecordStore,
    /// JWT issuing and verification
    pub tokens: TokenService,
    /// Locks held across read-compute-write rank cycles
    pub scope_locks: ScopeLocks,
    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: RecordStore, config: ServerConfig) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(&config),
            scope_locks: ScopeLocks::new(),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for RecordStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for ScopeLocks {
    fn from_ref(state: &AppState) -> Self {
        state.scope_locks.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
