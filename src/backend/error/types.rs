/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 *
 * # Error Types
 *
 * - `HandlerError` - a request rejected with an explicit status and message
 * - `Store` - record store failures
 * - `Order` - rank requests the ordering functions refused
 * - `SharedError` - field validation failures
 *
 * # Status Mapping
 *
 * Store errors map to 404 (`NotFound`), 409 (`Conflict`) or 500. Their
 * details are logged but never sent to the client. Ordering and validation
 * errors are 400 with their message passed through.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::backend::store::StoreError;
use crate::shared::{OrderError, SharedError};

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use taskboard::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Title is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::not_found("Board not found");
/// assert_eq!(err.message(), "Board not found");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request rejected with an explicit status (missing fields, access
    /// checks, unknown records)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Message sent to the client
        message: String,
    },

    /// Record store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Rejected rank request
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Shared error (validation)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 with the standard "Access denied" message
    pub fn forbidden() -> Self {
        Self::handler(StatusCode::FORBIDDEN, "Access denied")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 500 with a generic message; details belong in the log
    pub fn internal() -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Store` - 404 / 409 / 500 depending on the store error
    /// - `Order` - 400 Bad Request
    /// - `SharedError` - 400 Bad Request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Store(err) => match err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::RankOverflow(_) | StoreError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(_) => StatusCode::BAD_REQUEST,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the message sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Store(StoreError::NotFound) => "Not found".to_string(),
            Self::Store(StoreError::Conflict(_)) => {
                "The resource was changed by another request, please retry".to_string()
            }
            Self::Store(_) => "Internal server error".to_string(),
            Self::Order(err) => err.to_string(),
            Self::SharedError(err) => err.reason().to_string(),
        }
    }
}
