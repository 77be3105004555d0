//! Backend Module
//!
//! All server-side code: the Axum HTTP server, authentication, the board,
//! column and card handlers, and the record store behind them.
//!
//! This module is only compiled when the `server` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Application state, store loading, app creation
//! - **`routes`** - Router assembly and HTTP layers
//! - **`auth`** - Registration, login, accounts, JWT sessions
//! - **`boards`**, **`columns`**, **`cards`** - Resource handlers
//! - **`ordering`** - Scope locks and rank reconciliation around the pure
//!   functions in [`crate::shared::ordering`]
//! - **`store`** - PostgreSQL and in-memory persistence
//! - **`middleware`** - Auth middleware and request extractors
//! - **`error`** - `BackendError` and its JSON response
//!
//! # Rank Changes
//!
//! Every request that changes column or card ranks follows one cycle:
//!
//! 1. Validate the body into a typed request
//! 2. Check ownership of the board
//! 3. Lock the sibling scope (two scopes for a card move)
//! 4. Re-read the siblings and reconcile them
//! 5. Compute the shift set
//! 6. Write the shift set and the entity change in one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use taskboard::backend::server::create_app;
//! use taskboard::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Board handlers
pub mod boards;

/// Column handlers
pub mod columns;

/// Card handlers
pub mod cards;

/// Scope locks and reconciliation
pub mod ordering;

/// Persistence
pub mod store;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::create_app;
