//! Middleware Module
//!
//! This module contains the request processing that runs before handlers.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer token verification and the `AuthUser` extractor
//! - **`extract`** - JSON body and query extractors with JSON error bodies
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use taskboard::backend::middleware::auth_middleware;
//! use taskboard::backend::server::state::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub mod extract;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use extract::{Params, Payload};
