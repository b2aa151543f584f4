use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::access::operation_for;
use crate::error::ApiError;
use crate::services::AuthUser;

/// Role gate. Runs after `jwt_auth_middleware`; resolves the matched route to
/// an `Operation` and checks the caller's role against its minimum.
pub async fn access_control_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let Some(operation) = operation_for(request.method(), &route) else {
        tracing::warn!("No access rule for {} {}; denying", request.method(), route);
        return Err(ApiError::forbidden("Access denied"));
    };

    if !operation.permits(user.role) {
        tracing::warn!(
            "User {} ({}) denied {:?}, requires {}",
            user.id,
            user.role,
            operation,
            operation.minimum_role()
        );
        return Err(ApiError::forbidden(format!(
            "Operation requires role {} or higher",
            operation.minimum_role()
        )));
    }

    Ok(next.run(request).await)
}
