//! Token issuance and verification, password hashing and the role table.

pub mod access;
pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::database::models::{Role, User};
use crate::database::DatabaseError;

pub use access::{Operation, ROUTE_OPERATIONS};
pub use password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is deactivated")]
    AccountDisabled,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    WeakPassword(&'static str),

    #[error("Email is already registered: {0}")]
    EmailTaken(String),

    #[error("Token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    pub role: Role,
    pub uid: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign an HS256 token for `user`, valid for `jwt_expiration_ms`.
pub fn issue_token(user: &User, config: &SecurityConfig) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(Duration::milliseconds(config.jwt_expiration_ms))
        .unwrap_or(now);
    let claims = Claims {
        sub: user.email.clone(),
        role: user.role,
        uid: user.id,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(IssuedToken { token, expires_at })
}

/// Verify signature and expiry.
pub fn decode_token(token: &str, config: &SecurityConfig) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AuthError::InvalidToken
    })
}
