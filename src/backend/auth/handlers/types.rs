/**
 * Account Handler Types
 *
 * Request bodies arrive with every field optional so that a missing field is
 * reported with the same message as a malformed one. `validate()` turns each
 * raw body into a typed request or the first validation error.
 */

use serde::{Deserialize, Serialize};

use crate::shared::validation::{validate_email, validate_password, validate_username};
use crate::shared::{SharedError, UserProfile};

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Validated registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, SharedError> {
        let username = validate_username(self.username.as_deref().unwrap_or_default())?;
        let email = validate_email(self.email.as_deref().unwrap_or_default())?;
        let password = self.password.unwrap_or_default();
        validate_password(&password)?;
        Ok(Registration {
            username,
            email,
            password,
            is_admin: self.is_admin,
        })
    }
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, SharedError> {
        let email = validate_email(self.email.as_deref().unwrap_or_default())?;
        let password = self.password.unwrap_or_default();
        validate_password(&password)?;
        Ok(Credentials { email, password })
    }
}

/// Login response
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

/// Account update request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated account update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<AccountUpdate, SharedError> {
        let username = self.username.filter(|u| !u.is_empty());
        let password = self.password.filter(|p| !p.is_empty());
        if username.is_none() && password.is_none() {
            return Err(SharedError::validation(
                "body",
                "Either username or password must be provided",
            ));
        }
        let username = username.map(|u| validate_username(&u)).transpose()?;
        if let Some(password) = &password {
            validate_password(password)?;
        }
        Ok(AccountUpdate {
            user_id: self.user_id,
            username,
            password,
        })
    }
}

/// Account deletion request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DeleteUserRequest {
    pub user_id: Option<String>,
}

/// `{ "user": ... }`
#[derive(Serialize, Deserialize, Debug)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

/// `{ "users": [...] }`
#[derive(Serialize, Deserialize, Debug)]
pub struct UsersEnvelope {
    pub users: Vec<UserProfile>,
}

/// `{ "message": ... }`
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
