use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::check_password_rules;
use crate::auth::{decode_token, hash_password, issue_token, verify_password, AuthError};
use crate::config::SecurityConfig;
use crate::database::models::{NewUser, Role, User};
use crate::database::{DatabaseError, UserStore};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated caller, attached to each protected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    security: Arc<SecurityConfig>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, security: SecurityConfig) -> Self {
        Self {
            users,
            security: Arc::new(security),
        }
    }

    /// Self-service sign-up; always creates an active SALES_REP.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let password = request.password.unwrap_or_default();
        check_password_rules(&password, request.confirm_password.as_deref())?;
        self.create_user(
            required("First name", request.first_name)?,
            required("Last name", request.last_name)?,
            required("Email", request.email)?,
            &password,
            Role::SalesRep,
        )
        .await
    }

    /// Create an active user with an explicit role.
    pub async fn create_user(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(AuthError::EmailTaken(email));
        }

        let user = self
            .users
            .insert(NewUser {
                first_name,
                last_name,
                email: email.clone(),
                password_hash: hash_password(password)?,
                role,
                active: true,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => AuthError::EmailTaken(email.clone()),
                other => AuthError::Database(other),
            })?;
        info!("Registered user {} ({}) as {}", user.id, user.email, user.role);
        Ok(user)
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = required("Email", request.email)?;
        let password = request.password.unwrap_or_default();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if verify_password(&password, &user.password_hash) => user,
            _ => {
                warn!("Failed login for {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };
        if !user.active {
            warn!("Login attempt on deactivated account {}", user.id);
            return Err(AuthError::AccountDisabled);
        }

        let issued = issue_token(&user, &self.security)?;
        info!("User {} logged in", user.id);
        Ok(LoginResponse {
            token: issued.token,
            token_type: "Bearer",
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            expires_at: issued.expires_at,
        })
    }

    /// Resolve a bearer token to a live, active user. The role comes from the
    /// stored user, not the token.
    pub async fn current_actor(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = decode_token(token, &self.security)?;
        let user = self
            .users
            .find_by_id(claims.uid)
            .await?
            .filter(|u| u.email.eq_ignore_ascii_case(&claims.sub))
            .ok_or(AuthError::InvalidToken)?;
        if !user.active {
            return Err(AuthError::AccountDisabled);
        }
        Ok(AuthUser::from(&user))
    }

    pub async fn profile(&self, actor: &AuthUser) -> Result<User, AuthError> {
        self.users.find_by_id(actor.id).await?.ok_or(AuthError::InvalidToken)
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, AuthError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::MissingField(field)),
    }
}
