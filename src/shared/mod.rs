//! Shared Module
//!
//! This module contains types and logic that do not depend on the HTTP
//! server: the record types exchanged with clients, input validation,
//! configuration, and the sibling ordering functions that keep column and
//! card ranks dense.
//!
//! Everything here compiles without the `server` feature.

/// Board, column, card and user record types
pub mod board;

/// Shared error types
pub mod error;

/// Dense rank maintenance for sibling scopes
pub mod ordering;

/// Request field validation
pub mod validation;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use board::{Board, Card, Column, Ranked, UserProfile};
pub use error::SharedError;
pub use ordering::{OrderError, ShiftSet, Sibling};
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
