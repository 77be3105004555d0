/**
 * Login Handler
 *
 * `POST /user/login`
 *
 * Looks the user up by email, verifies the password with bcrypt and returns
 * a signed token. Unknown emails and wrong passwords get the same 401 so the
 * response does not reveal which accounts exist.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::backend::auth::sessions::TokenService;
use crate::backend::auth::users::verify_password;
use crate::backend::error::BackendError;
use crate::backend::middleware::Payload;
use crate::backend::store::RecordStore;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub async fn login(
    State(store): State<RecordStore>,
    State(tokens): State<TokenService>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    let credentials = request.validate()?;
    tracing::info!("Login request for: {}", credentials.email);

    let user = store
        .find_user_by_email(&credentials.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", credentials.email);
            BackendError::unauthorized(BAD_CREDENTIALS)
        })?;

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        tracing::warn!("Invalid password for user: {}", credentials.email);
        return Err(BackendError::unauthorized(BAD_CREDENTIALS));
    }

    let token = tokens.issue(&user).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal()
    })?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);
    Ok(Json(TokenResponse { token }))
}
