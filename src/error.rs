// HTTP API Error Types
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::models::RecordError;
use crate::database::DatabaseError;
use crate::filter::FilterError;
use crate::services::{LeadError, PatchError};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });
        if let ApiError::ValidationError { field_errors: Some(field_errors), .. } = self {
            response["field_errors"] = json!(field_errors);
        }
        response
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    /// Validation error whose message is also reported against `field`.
    pub fn field_error(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ApiError::validation_error(message, Some(field_errors))
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl(_) => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        tracing::warn!("Rejected lead query: {}", err);
        ApiError::field_error(err.field(), err.to_string())
    }
}

impl From<PatchError> for ApiError {
    fn from(err: PatchError) -> Self {
        match err.field() {
            Some(field) => ApiError::field_error(field, err.to_string()),
            None => ApiError::validation_error(err.to_string(), None),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        tracing::warn!("Rejected record: {}", err);
        match err {
            RecordError::MissingRequiredField(field) => ApiError::field_error(&camel_case(field), err.to_string()),
            other => ApiError::validation_error(other.to_string(), None),
        }
    }
}

impl From<LeadError> for ApiError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::NotFound(_) => ApiError::not_found(err.to_string()),
            LeadError::MissingField(field) => ApiError::field_error(&camel_case(field), err.to_string()),
            LeadError::Filter(e) => e.into(),
            LeadError::Patch(e) => e.into(),
            LeadError::Invalid(e) => e.into(),
            LeadError::Database(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::MissingToken
            | AuthError::InvalidToken => ApiError::unauthorized(err.to_string()),
            AuthError::MissingField(field) => ApiError::field_error(&camel_case(field), err.to_string()),
            AuthError::PasswordMismatch => ApiError::field_error("confirmPassword", err.to_string()),
            AuthError::WeakPassword(_) => ApiError::field_error("password", err.to_string()),
            AuthError::EmailTaken(_) => ApiError::conflict(err.to_string()),
            AuthError::Token(e) => {
                tracing::error!("JWT signing error: {}", e);
                ApiError::internal_server_error("Could not issue token")
            }
            AuthError::Hash(e) => {
                tracing::error!("Password hashing error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// "Company name" -> "companyName"
fn camel_case(label: &str) -> String {
    let mut words = label.split_whitespace();
    let mut out = words.next().map(str::to_lowercase).unwrap_or_default();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_errors_name_the_field() {
        let err: ApiError = FilterError::InvalidEndDate("soon".into()).into();
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Invalid end date format. Use ISO format: 2025-08-01T00:00:00");
        assert!(body["field_errors"]["endDate"].is_string());
    }

    #[test]
    fn lead_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(LeadError::NotFound(3)).status_code(), 404);
        let missing = ApiError::from(LeadError::MissingField("Company name"));
        assert_eq!(missing.status_code(), 400);
        assert!(missing.to_json()["field_errors"]["companyName"].is_string());

        let invalid = ApiError::from(LeadError::Invalid(RecordError::MissingRequiredField("Contact name")));
        assert_eq!(invalid.status_code(), 400);
        assert!(invalid.to_json()["field_errors"]["contactName"].is_string());
    }

    #[test]
    fn internal_errors_are_masked() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::Protocol("relation \"leads\" does not exist".into())).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("leads"));
    }

    #[test]
    fn auth_errors() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status_code(), 401);
        assert_eq!(ApiError::from(AuthError::EmailTaken("a@b.c".into())).status_code(), 409);
        assert_eq!(ApiError::from(AuthError::PasswordMismatch).status_code(), 400);
    }

    #[test]
    fn camel_cases_labels() {
        assert_eq!(camel_case("Company name"), "companyName");
        assert_eq!(camel_case("Email"), "email");
    }
}
