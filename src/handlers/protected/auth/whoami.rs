use axum::extract::State;
use axum::Extension;

use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/v1/auth/me - profile of the authenticated caller
pub async fn whoami(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let profile = state.auth.profile(&user).await?;
    Ok(ApiResponse::success(profile))
}
