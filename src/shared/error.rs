//! Shared Error Types
//!
//! This module defines error types that are independent of the HTTP layer.
//! They describe bad input detected while validating a request, before any
//! record is loaded or any rank is computed.
//!
//! # Error Categories
//!
//! - `ValidationError` - a request field is missing or malformed
//!
//! # Usage
//!
//! ```rust
//! use taskboard::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title is required");
//! assert_eq!(error.reason(), "Title is required");
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The message shown to API clients, without the field prefix
    pub fn reason(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}
