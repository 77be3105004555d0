//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` sub-states
//! - **`config`** - Record store selection and database setup
//! - **`init`** - App creation and background tasks
//!
//! # Example
//!
//! ```rust,no_run
//! use taskboard::backend::server::create_app;
//! use taskboard::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Record store loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_app, create_app};
pub use state::AppState;
