/**
 * Session Management and JWT Tokens
 *
 * Issues and verifies the bearer tokens handed out by `POST /user/login`.
 * The signing secret and lifetime come from `ServerConfig`; the service is
 * built once at startup and shared through `AppState`.
 */

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::UserRecord;
use crate::shared::ServerConfig;

/// Secret used when `JWT_SECRET` is not configured
const DEVELOPMENT_SECRET: &str = "taskboard-development-secret";

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Username
    pub username: String,
    /// Admin flag at the time the token was issued
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl_secs: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            ttl_secs: ttl_hours.saturating_mul(60 * 60),
        }
    }

    /// Build from configuration, falling back to a development secret
    pub fn from_config(config: &ServerConfig) -> Self {
        let secret = match config.jwt_secret.as_deref() {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET is not set, using an insecure development secret");
                DEVELOPMENT_SECRET
            }
        };
        Self::new(secret, config.token_ttl_hours)
    }

    /// Create a token for `user`
    pub fn issue(&self, user: &UserRecord) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the user id it was issued for
    pub fn user_id(&self, token: &str) -> Result<Uuid, String> {
        let claims = self
            .verify(token)
            .map_err(|e| format!("Token verification failed: {}", e))?;
        Uuid::parse_str(&claims.sub).map_err(|e| format!("Invalid user ID in token: {}", e))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
