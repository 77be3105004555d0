/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and hands the token's identity to handlers.
 *
 * The identity comes from the token alone; handlers that need the stored
 * account look it up and answer 404 "User not found" when it is gone.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::TokenService;
use crate::backend::error::BackendError;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Owners and admins may act on a record
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_admin || self.user_id == owner_id
    }

    /// 403 unless [`can_access`](Self::can_access) holds
    pub fn require_access(&self, owner_id: Uuid) -> Result<(), BackendError> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, owner_id = %owner_id, "Access denied");
            Err(BackendError::forbidden())
        }
    }

    /// 403 unless the user is an admin
    pub fn require_admin(&self) -> Result<(), BackendError> {
        if self.is_admin {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "Admin access denied");
            Err(BackendError::forbidden())
        }
    }
}

/// Read the bearer token from the Authorization header
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token
/// 3. Attaches the user data to the request extensions
///
/// Returns 401 "Token not found" without a token and 401 "Access denied,
/// bad token" when verification fails.
pub async fn auth_middleware(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(&request).ok_or_else(|| {
        tracing::warn!("Missing bearer token");
        BackendError::unauthorized("Token not found")
    })?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Access denied, bad token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        BackendError::unauthorized("Access denied, bad token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
        username: claims.username,
        is_admin: claims.is_admin,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// Reads the user the auth middleware attached to the request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Token not found")
            })?;

        Ok(AuthUser(user))
    }
}
