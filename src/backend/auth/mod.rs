//! Authentication Module
//!
//! This module handles user registration, login, account management and
//! session tokens.
//!
//! # Architecture
//!
//! - **`users`** - password hashing and account lookups
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for the `/user` endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → user created (201)
//! 2. **Login**: email and password verified → JWT token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` is checked
//!    by `middleware::auth_middleware`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after `token_ttl_hours` (30 days by default)
//! - Invalid credentials return 401 without saying which part was wrong

/// Password hashing and account lookups
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use handlers::{delete_user, get_user, list_users, login, register, update_user};
pub use sessions::{Claims, TokenService};
