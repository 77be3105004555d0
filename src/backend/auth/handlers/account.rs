/**
 * Account Handlers
 *
 * - `GET /user` - the requester's account
 * - `GET /user/all` - every account (admin only)
 * - `PUT /user` - change username and/or password
 * - `DELETE /user` - delete an account with its boards, columns and cards
 *
 * `PUT` and `DELETE` act on the requester unless the body names another
 * `user_id`, which only admins may do.
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{
    DeleteUserRequest, MessageResponse, UpdateUserRequest, UserEnvelope, UsersEnvelope,
};
use crate::backend::auth::users::{hash_password, load_user, target_user};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Payload};
use crate::backend::store::{RecordStore, UserPatch};
use crate::shared::ServerConfig;

pub async fn get_user(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserEnvelope>, BackendError> {
    let user = load_user(&store, auth.user_id).await?;
    Ok(Json(UserEnvelope {
        user: user.profile(),
    }))
}

pub async fn list_users(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UsersEnvelope>, BackendError> {
    auth.require_admin()?;

    let users = store.list_users().await?;
    if users.is_empty() {
        return Err(BackendError::not_found("No users found"));
    }
    tracing::debug!("Listing {} users for admin {}", users.len(), auth.user_id);

    Ok(Json(UsersEnvelope {
        users: users.iter().map(|u| u.profile()).collect(),
    }))
}

pub async fn update_user(
    State(store): State<RecordStore>,
    State(config): State<Arc<ServerConfig>>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, BackendError> {
    let update = request.validate()?;
    let user_id = target_user(&auth, update.user_id.as_deref())?;

    let password_hash = match update.password {
        Some(password) => Some(hash_password(password, config.bcrypt_cost).await?),
        None => None,
    };

    let user = store
        .update_user(
            user_id,
            UserPatch {
                username: update.username,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user_id);
            BackendError::not_found("User not found")
        })?;

    tracing::info!("User {} updated by {}", user.id, auth.user_id);
    Ok(Json(UserEnvelope {
        user: user.profile(),
    }))
}

pub async fn delete_user(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<DeleteUserRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let user_id = target_user(&auth, request.user_id.as_deref())?;

    if !store.delete_user(user_id).await? {
        tracing::warn!("User not found: {}", user_id);
        return Err(BackendError::not_found("User not found"));
    }

    tracing::info!("User {} deleted by {}", user_id, auth.user_id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
