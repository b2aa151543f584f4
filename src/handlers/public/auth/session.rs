use axum::response::Json;
use serde_json::{json, Value};

/// POST /api/v1/auth/logout - tokens are stateless; the client discards its copy
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}

/// GET /api/v1/auth/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP", "service": "auth" }))
}
