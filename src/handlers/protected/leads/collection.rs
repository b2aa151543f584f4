use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::app::AppState;
use crate::database::models::Lead;
use crate::filter::Page;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{LeadRequest, SearchResults};

use super::params::{parse_source, parse_status, LeadQuery};

type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// GET /api/v1/leads - filtered, paginated listing
pub async fn list(State(state): State<AppState>, query: QueryPairs) -> ApiResult<Page<Lead>> {
    let Query(pairs) = query?;
    let query = LeadQuery::from_pairs(pairs)?;
    let page = query.page_request(&state.config.pagination)?;
    let criteria = query.criteria()?;
    let result = state.leads.list(&criteria, &page).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/leads/search?q= - free-text search across company, contact and email
pub async fn search(State(state): State<AppState>, query: QueryPairs) -> ApiResult<SearchResults> {
    let Query(pairs) = query?;
    let query = LeadQuery::from_pairs(pairs)?;
    let page = query.page_request(&state.config.pagination)?;
    let results = state.leads.search(query.q.as_deref(), &page).await?;
    Ok(ApiResponse::success(results))
}

/// GET /api/v1/leads/status/:status - every lead with the status, unpaginated
pub async fn by_status(State(state): State<AppState>, Path(status): Path<String>) -> ApiResult<Vec<Lead>> {
    let status = parse_status(&status)?;
    let leads = state.leads.by_status(status).await?;
    Ok(ApiResponse::success(leads))
}

/// GET /api/v1/leads/source/:source - paginated leads with the source
pub async fn by_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
    query: QueryPairs,
) -> ApiResult<Page<Lead>> {
    let source = parse_source(&source)?;
    let Query(pairs) = query?;
    let page = LeadQuery::from_pairs(pairs)?.page_request(&state.config.pagination)?;
    let result = state.leads.by_source(source, &page).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/leads - create a lead owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> ApiResult<Lead> {
    let Json(request) = payload?;
    let lead = state.leads.create(request, user.id).await?;
    Ok(ApiResponse::created(lead))
}
