//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod board_test;
mod column_test;
