use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Lead;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LeadRequest;

type LeadId = Result<Path<i64>, PathRejection>;

/// GET /api/v1/leads/:id
pub async fn get(State(state): State<AppState>, id: LeadId) -> ApiResult<Lead> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.leads.get(id).await?))
}

/// PUT /api/v1/leads/:id - full replace
pub async fn put(
    State(state): State<AppState>,
    id: LeadId,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> ApiResult<Lead> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(ApiResponse::success(state.leads.replace(id, request).await?))
}

/// PATCH /api/v1/leads/:id - partial update from a field map
pub async fn patch(
    State(state): State<AppState>,
    id: LeadId,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Lead> {
    let Path(id) = id?;
    let Json(body) = payload?;
    Ok(ApiResponse::success(state.leads.patch(id, &body).await?))
}

/// DELETE /api/v1/leads/:id - MANAGER or ADMIN only
pub async fn delete(State(state): State<AppState>, id: LeadId) -> ApiResult<()> {
    let Path(id) = id?;
    state.leads.delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}
