/**
 * Register Handler
 *
 * `POST /user/register`
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Reject an email that is already registered (403)
 * 3. Hash the password with the configured bcrypt cost
 * 4. Create the user; answer 201 with an empty body
 *
 * `isAdmin` is honoured only when the server allows admin registration.
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::backend::auth::handlers::types::RegisterRequest;
use crate::backend::auth::users::hash_password;
use crate::backend::error::BackendError;
use crate::backend::middleware::Payload;
use crate::backend::store::{NewUser, RecordStore, StoreError};
use crate::shared::ServerConfig;

pub async fn register(
    State(store): State<RecordStore>,
    State(config): State<Arc<ServerConfig>>,
    Payload(request): Payload<RegisterRequest>,
) -> Result<StatusCode, BackendError> {
    let registration = request.validate().map_err(|e| {
        tracing::warn!("Invalid registration: {}", e);
        e
    })?;
    tracing::info!("Register request for email: {}", registration.email);

    if store.find_user_by_email(&registration.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", registration.email);
        return Err(BackendError::handler(StatusCode::FORBIDDEN, "Email already in use"));
    }

    let is_admin = registration.is_admin && config.allow_admin_registration;
    if registration.is_admin && !is_admin {
        tracing::warn!("Ignoring isAdmin for {}: admin registration is disabled", registration.email);
    }

    let password_hash = hash_password(registration.password, config.bcrypt_cost).await?;

    let user = store
        .create_user(NewUser {
            username: registration.username,
            email: registration.email,
            password_hash,
            is_admin,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            StoreError::Conflict(_) => {
                BackendError::handler(StatusCode::FORBIDDEN, "Email already in use")
            }
            other => {
                tracing::error!("Failed to create user: {:?}", other);
                BackendError::from(other)
            }
        })?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);
    Ok(StatusCode::CREATED)
}
