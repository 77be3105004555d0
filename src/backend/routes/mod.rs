//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Router assembly, HTTP layers and fallbacks
//! - **`api_routes`** - The `/user`, `/board`, `/column` and `/card` endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use taskboard::backend::routes::create_router;
//! use taskboard::backend::server::state::AppState;
//! use taskboard::backend::store::RecordStore;
//! use taskboard::shared::ServerConfig;
//!
//! let router = create_router(AppState::new(RecordStore::memory(), ServerConfig::default()));
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
