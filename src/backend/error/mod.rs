//! Backend Error Module
//!
//! This module defines the error type returned by HTTP handlers and its
//! conversion into JSON responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status/message mapping
//! - **`conversion`** - `IntoResponse` implementation
//!
//! Lower layers keep their own error enums (`SharedError`, `OrderError`,
//! `StoreError`); each converts into `BackendError` with `?`.
//!
//! # Example
//!
//! ```rust,no_run
//! use taskboard::backend::error::BackendError;
//! use axum::Json;
//!
//! async fn handler() -> Result<Json<()>, BackendError> {
//!     Err(BackendError::bad_request("column_id is required"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
