//! Taskboard - Main Library
//!
//! A kanban board service: users own boards, boards hold ordered columns,
//! columns hold ordered cards. Column and card ranks are kept dense
//! (`0..n` within each parent) across concurrent requests.
//!
//! # Module Structure
//!
//! - **`shared`** - Record types, validation, configuration and the pure
//!   sibling ordering functions. Always compiled.
//! - **`backend`** - Axum server, handlers and record store. Only compiled
//!   with the `server` feature (on by default).
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskboard::backend::server::create_app;
//! use taskboard::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let addr = config.bind_address()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;
