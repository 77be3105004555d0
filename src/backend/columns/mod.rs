//! Columns Module
//!
//! HTTP handlers for `/column`. A board's columns form one sibling scope.

pub mod types;
pub mod handlers;

pub use handlers::{create_column, delete_column, list_columns, modify_column, owned_column};
