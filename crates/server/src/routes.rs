pub mod access;
pub mod auth;
pub mod business;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use self::access::{guard, ProtectedRoute};
use self::auth::ServerState;
use crate::openapi::ApiDoc;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// `/api/business` routes. Static segments (`me`) win over `:userId`.
fn business_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/profile", guard(state, ProtectedRoute::UpsertProfile, post(business::upsert_profile)))
        .route("/profiles", get(business::list_profiles))
        .route("/profile/me", guard(state, ProtectedRoute::OwnProfile, get(business::own_profile)))
        .route("/profile/:userId", get(business::profile_by_owner))
        .route("/search", get(business::search))
        .route("/financials/me", guard(state, ProtectedRoute::OwnFinancials, get(business::own_financials)))
        .route("/financials", guard(state, ProtectedRoute::ReplaceFinancials, post(business::replace_financials)))
        .route("/financials/:userId", get(business::financials_by_owner))
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Build the full application router: health, docs, auth and business routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/auth", auth_routes())
        .nest("/api/business", business_routes(&state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
