//! Boards Module
//!
//! HTTP handlers for `/board` and the ownership check shared with the
//! column and card handlers.

/// Request types
pub mod types;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_board, delete_board, list_boards, owned_board, update_board};
