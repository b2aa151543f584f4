//! Shared state and router assembly.

use std::sync::Arc;

use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::database::{LeadStore, UserStore};
use crate::handlers::{self, protected, public};
use crate::middleware::{access_control_middleware, cors_layer, jwt_auth_middleware, with_security_headers};
use crate::services::{AuthService, LeadService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub leads: LeadService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: AppConfig, leads: Arc<dyn LeadStore>, users: Arc<dyn UserStore>) -> Self {
        let auth = AuthService::new(users, config.security.clone());
        Self {
            config: Arc::new(config),
            leads: LeadService::new(leads),
            auth,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public_routes: Router<AppState> = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/auth/register", post(public::auth::register))
        .route("/api/v1/auth/login", post(public::auth::login))
        .route("/api/v1/auth/logout", post(public::auth::logout))
        .route("/api/v1/auth/health", get(public::auth::health));

    // Layers run bottom-up: authentication first, then the role gate.
    let protected_routes: Router<AppState> = Router::new()
        .route("/api/v1/leads", get(protected::leads::list).post(protected::leads::create))
        .route("/api/v1/leads/search", get(protected::leads::search))
        .route("/api/v1/leads/stats", get(protected::leads::stats))
        .route("/api/v1/leads/count", get(protected::leads::count))
        .route("/api/v1/leads/status/:status", get(protected::leads::by_status))
        .route("/api/v1/leads/source/:source", get(protected::leads::by_source))
        .route(
            "/api/v1/leads/:id",
            get(protected::leads::get)
                .put(protected::leads::put)
                .patch(protected::leads::patch)
                .delete(protected::leads::delete),
        )
        .route("/api/v1/auth/me", get(protected::auth::whoami))
        .route_layer(axum_middleware::from_fn(access_control_middleware))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new().merge(public_routes).merge(protected_routes);
    if state.config.security.security_headers {
        router = with_security_headers(router);
    }

    let request_id = HeaderName::from_static("x-request-id");
    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.security)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::database::models::{LeadStatus, Role};
    use crate::testing::{lead_at, TestContext};

    struct Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    }

    async fn send(router: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply { status, headers, body }
    }

    async fn seeded() -> (TestContext, Router) {
        let ctx = TestContext::new().await;
        ctx.leads.seed(lead_at("Acme Corp", "Jane Doe", "jane@acme.com", LeadStatus::New, "2025-08-01T10:00:00"));
        ctx.leads.seed(lead_at("Globex", "Hank Scorpio", "hank@globex.com", LeadStatus::Qualified, "2025-08-05T09:30:00"));
        ctx.leads.seed(lead_at("Initech", "Bill Lumbergh", "bill@initech.com", LeadStatus::New, "2025-08-10T14:00:00"));
        let router = build_router(ctx.state.clone());
        (ctx, router)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_ctx, router) = seeded().await;
        let reply = send(&router, Method::GET, "/health", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["status"], "ok");
    }

    #[tokio::test]
    async fn responses_carry_security_headers_and_request_id() {
        let (_ctx, router) = seeded().await;
        let reply = send(&router, Method::GET, "/api/v1/auth/health", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({ "status": "UP", "service": "auth" }));
        assert_eq!(reply.headers["x-frame-options"], "DENY");
        assert_eq!(reply.headers["x-content-type-options"], "nosniff");
        assert!(reply.headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn leads_require_a_token() {
        let (_ctx, router) = seeded().await;
        let reply = send(&router, Method::GET, "/api/v1/leads", None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["code"], "UNAUTHORIZED");

        let reply = send(&router, Method::GET, "/api/v1/leads", Some("not-a-jwt"), None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sales_rep_cannot_delete_but_manager_can() {
        let (ctx, router) = seeded().await;
        let rep = ctx.token_for(Role::SalesRep).await;
        let reply = send(&router, Method::DELETE, "/api/v1/leads/1", Some(&rep), None).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);

        let manager = ctx.token_for(Role::Manager).await;
        let reply = send(&router, Method::DELETE, "/api/v1/leads/1", Some(&manager), None).await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = send(&router, Method::DELETE, "/api/v1/leads/1", Some(&manager), None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["message"], "Lead not found with id: 1");
    }

    #[tokio::test]
    async fn create_applies_default_status_and_source() {
        let (ctx, router) = seeded().await;
        let token = ctx.token_for(Role::SalesRep).await;
        let body = json!({ "companyName": "Umbrella", "contactName": "Alice", "email": "alice@umbrella.com" });
        let reply = send(&router, Method::POST, "/api/v1/leads", Some(&token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body["id"], 4);
        assert_eq!(reply.body["status"], "NEW");
        assert_eq!(reply.body["source"], "OTHER");
        assert_eq!(reply.body["ownerId"], 1);

        let body = json!({ "contactName": "Alice", "email": "alice@umbrella.com" });
        let reply = send(&router, Method::POST, "/api/v1/leads", Some(&token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(reply.body["field_errors"]["companyName"].is_string());
    }

    #[tokio::test]
    async fn list_filters_by_status_and_counts_every_status() {
        let (ctx, router) = seeded().await;
        let token = ctx.token_for(Role::SalesRep).await;

        let reply = send(&router, Method::GET, "/api/v1/leads?status=NEW", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["totalElements"], 2);
        assert_eq!(reply.body["content"].as_array().unwrap().len(), 2);

        let reply = send(&router, Method::GET, "/api/v1/leads/count", Some(&token), None).await;
        assert_eq!(
            reply.body,
            json!({ "NEW": 2, "CONTACTED": 0, "QUALIFIED": 1, "LOST": 0, "CONVERTED": 0 })
        );

        let reply = send(&router, Method::GET, "/api/v1/leads?status=new", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_rejects_inverted_date_range() {
        let (ctx, router) = seeded().await;
        let token = ctx.token_for(Role::SalesRep).await;
        let uri = "/api/v1/leads?startDate=2025-09-01T00:00:00&endDate=2025-08-01T00:00:00";
        let reply = send(&router, Method::GET, uri, Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["message"], "Start date cannot be after end date");

        let uri = "/api/v1/leads?startDate=2025-08-04T00:00:00&endDate=2025-08-31T00:00:00";
        let reply = send(&router, Method::GET, uri, Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["totalElements"], 2);
    }

    #[tokio::test]
    async fn search_matches_email_and_requires_a_term() {
        let (ctx, router) = seeded().await;
        let token = ctx.token_for(Role::SalesRep).await;

        let reply = send(&router, Method::GET, "/api/v1/leads/search?q=GLOBEX.COM", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["totalResults"], 1);
        assert_eq!(reply.body["searchTerm"], "GLOBEX.COM");
        assert_eq!(reply.body["content"][0]["companyName"], "Globex");

        let reply = send(&router, Method::GET, "/api/v1/leads/search?q=%20%20", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_rejects_bad_status_and_ignores_unknown_keys() {
        let (ctx, router) = seeded().await;
        let token = ctx.token_for(Role::SalesRep).await;

        let reply = send(&router, Method::PATCH, "/api/v1/leads/2", Some(&token), Some(json!({ "status": "WON" }))).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        let reply = send(&router, Method::GET, "/api/v1/leads/2", Some(&token), None).await;
        assert_eq!(reply.body["status"], "QUALIFIED");

        let body = json!({ "status": "CONTACTED", "favouriteColour": "green" });
        let reply = send(&router, Method::PATCH, "/api/v1/leads/2", Some(&token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["status"], "CONTACTED");
        assert_eq!(reply.body["companyName"], "Globex");

        let reply = send(&router, Method::PATCH, "/api/v1/leads/99", Some(&token), Some(json!({}))).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn register_then_login_then_whoami() {
        let (_ctx, router) = seeded().await;
        let body = json!({
            "firstName": "Dana",
            "lastName": "Scully",
            "email": "Dana@FBI.gov",
            "password": "trustno1!",
            "confirmPassword": "trustno1!"
        });
        let reply = send(&router, Method::POST, "/api/v1/auth/register", None, Some(body.clone())).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body["email"], "dana@fbi.gov");

        let reply = send(&router, Method::POST, "/api/v1/auth/register", None, Some(body)).await;
        assert_eq!(reply.status, StatusCode::CONFLICT);

        let credentials = json!({ "email": "dana@fbi.gov", "password": "wrong-password" });
        let reply = send(&router, Method::POST, "/api/v1/auth/login", None, Some(credentials)).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

        let credentials = json!({ "email": "dana@fbi.gov", "password": "trustno1!" });
        let reply = send(&router, Method::POST, "/api/v1/auth/login", None, Some(credentials)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["tokenType"], "Bearer");
        assert_eq!(reply.body["role"], "SALES_REP");
        let token = reply.body["token"].as_str().unwrap().to_string();

        let reply = send(&router, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["firstName"], "Dana");
        assert!(reply.body.get("passwordHash").is_none());
    }
}
