use std::collections::BTreeMap;

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{timestamp_now, LeadStatus};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LeadStatistics;

/// GET /api/v1/leads/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<LeadStatistics> {
    let statistics = state.leads.statistics(timestamp_now()).await?;
    Ok(ApiResponse::success(statistics))
}

/// GET /api/v1/leads/count - per-status counts, every status present
pub async fn count(State(state): State<AppState>) -> ApiResult<BTreeMap<LeadStatus, i64>> {
    Ok(ApiResponse::success(state.leads.status_counts().await?))
}
