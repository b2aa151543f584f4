use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegisterRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: i64,
    pub email: String,
}

/// POST /api/v1/auth/register - create an active SALES_REP account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let Json(request) = payload?;
    let user = state.auth.register(request).await?;
    Ok(ApiResponse::created(RegisterResponse {
        message: "User registered successfully",
        user_id: user.id,
        email: user.email,
    }))
}
