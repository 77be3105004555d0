/**
 * User Account Helpers
 *
 * Password hashing and the lookups shared by the account handlers. bcrypt
 * runs on the blocking thread pool so a high cost factor does not stall the
 * async workers.
 */

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::store::{RecordStore, UserRecord};

/// Hash a password with the configured bcrypt cost
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {:?}", e);
            BackendError::internal()
        })?
        .map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            BackendError::internal()
        })
}

/// Check a password against a stored hash
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {:?}", e);
            BackendError::internal()
        })
        .map(|result| {
            result.unwrap_or_else(|e| {
                tracing::error!("Password verification error: {:?}", e);
                false
            })
        })
}

/// Resolve the account a request acts on
///
/// Without `user_id` that is the requester's own account. Naming another
/// user requires admin rights.
pub fn target_user(auth: &AuthenticatedUser, user_id: Option<&str>) -> Result<Uuid, BackendError> {
    let Some(raw) = user_id.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(auth.user_id);
    };
    let id = crate::shared::validation::parse_id(raw)
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    auth.require_access(id)?;
    Ok(id)
}

/// Load an account or answer 404 "User not found"
pub async fn load_user(store: &RecordStore, id: Uuid) -> Result<UserRecord, BackendError> {
    store.find_user(id).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", id);
        BackendError::not_found("User not found")
    })
}
