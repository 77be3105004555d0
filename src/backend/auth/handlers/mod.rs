//! Account Handlers Module
//!
//! HTTP handlers for the `/user` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - User authentication handler
//! └── account.rs  - Get, list, update and delete accounts
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /user/register
//! - **`login`** - POST /user/login
//! - **`get_user`** - GET /user
//! - **`list_users`** - GET /user/all (admin)
//! - **`update_user`** - PUT /user
//! - **`delete_user`** - DELETE /user

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Account handlers
pub mod account;

pub use types::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse, UpdateUserRequest};

pub use account::{delete_user, get_user, list_users, update_user};
pub use login::login;
pub use register::register;
