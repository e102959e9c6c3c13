use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, warn};

use service::auth::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::profile::repo::seaorm::SeaOrmProfileRepository;
use service::profile::repository::ProfileRepository;
use service::profile::ProfileService;

use crate::errors::JsonApiError;

/// Shared handler state. Services sit behind trait objects so tests can swap in memory repositories.
#[derive(Clone)]
pub struct ServerState {
    pub auth_svc: Arc<AuthService<dyn AuthRepository>>,
    pub profile_svc: Arc<ProfileService<dyn ProfileRepository>>,
}

impl ServerState {
    pub fn new(
        auth_repo: Arc<dyn AuthRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        auth: &configs::AuthConfig,
    ) -> Self {
        let cfg = AuthConfig::new(auth.jwt_secret.clone(), auth.token_ttl_hours);
        Self {
            auth_svc: Arc::new(AuthService::new(auth_repo, cfg)),
            profile_svc: Arc::new(ProfileService::new(profile_repo)),
        }
    }

    pub fn with_seaorm(db: DatabaseConnection, auth: &configs::AuthConfig) -> Self {
        Self::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            Arc::new(SeaOrmProfileRepository { db }),
            auth,
        )
    }
}

/// Malformed auth payloads are client input errors.
fn auth_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| JsonApiError::bad_request(rejection.body_text()))
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::UserDoc), (status = 400, description = "Bad Request", body = crate::openapi::MessageDoc), (status = 409, description = "Conflict", body = crate::openapi::MessageDoc)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let input = auth_body(payload)?;
    match state.auth_svc.register(input).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user))),
        Err(AuthError::Validation(msg)) => Err(JsonApiError::bad_request(msg)),
        Err(AuthError::Conflict) => Err(JsonApiError::conflict("User already exists")),
        Err(e) => {
            error!(err = %e, code = e.code(), "register failed");
            Err(JsonApiError::internal(e.to_string()))
        }
    }
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = crate::openapi::LoginResponse), (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<AuthSession>, JsonApiError> {
    let input = auth_body(payload)?;
    match state.auth_svc.login(input).await {
        Ok(session) => Ok(Json(session)),
        Err(AuthError::Unauthorized) => Err(JsonApiError::unauthorized("Invalid credentials")),
        Err(e) => {
            error!(err = %e, code = e.code(), "login failed");
            Err(JsonApiError::internal(e.to_string()))
        }
    }
}

/// `Authorization: Bearer <token>`; anything else counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 校验 Bearer token，成功后把 Claims 注入 request 扩展供后续授权层与 handler 使用
/// 缺失 token 与非法/过期 token 均返回 401
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let claims = {
        let Some(token) = bearer_token(req.headers()) else {
            warn!(path = %path, "missing bearer token");
            return Err(JsonApiError::unauthorized("No token provided"));
        };
        match state.auth_svc.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                error!(path = %path, err = %e, "token validation failed");
                return Err(JsonApiError::unauthorized("Invalid token"));
            }
        }
    };
    debug!(path = %path, user_id = %claims.sub, role = ?claims.role, "token verified");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
