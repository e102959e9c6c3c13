use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use service::auth::token::Claims;
use service::errors::ServiceError;
use service::profile::domain::{BusinessProfile, Caller, FinancialStats, ProfileInput, ProfileWithOwner, RevenueSeries, UpsertOutcome};
use service::profile::search::SearchQuery;

use super::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsUpdated {
    pub message: String,
    pub financial_stats: FinancialStats,
}

/// Runs behind `authorize`, so the role is already known to be permitted.
fn caller(claims: &Claims) -> Caller {
    Caller::new(claims.sub, claims.role.unwrap_or_default())
}

/// Body decode failures are reported like any other store-level failure.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        warn!(status = %rejection.status(), err = %rejection.body_text(), "request body rejected");
        JsonApiError::internal(rejection.body_text())
    })
}

/// Owner ids arrive as raw path text; a malformed id is a store-level failure, not a 404.
fn owner_id(raw: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|e| JsonApiError::internal(format!("invalid user id \"{}\": {}", raw, e)))
}

fn internal(op: &'static str, e: ServiceError) -> JsonApiError {
    error!(op, err = %e, "request failed");
    JsonApiError::internal(e.message())
}

#[utoipa::path(post, path = "/api/business/profile", tag = "business", request_body = crate::openapi::ProfileInputDoc, security(("bearer" = [])), responses((status = 201, description = "Created", body = crate::openapi::BusinessProfileDoc), (status = 200, description = "Updated", body = crate::openapi::BusinessProfileDoc), (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc), (status = 403, description = "Forbidden", body = crate::openapi::MessageDoc), (status = 500, description = "Store error", body = crate::openapi::MessageDoc)))]
pub async fn upsert_profile(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<ProfileInput>, JsonRejection>,
) -> Result<(StatusCode, Json<BusinessProfile>), JsonApiError> {
    let input = json_body(payload)?;
    match state.profile_svc.upsert_own_profile(&caller(&claims), input).await {
        Ok((profile, UpsertOutcome::Created)) => Ok((StatusCode::CREATED, Json(profile))),
        Ok((profile, UpsertOutcome::Updated)) => Ok((StatusCode::OK, Json(profile))),
        Err(ServiceError::Forbidden(msg)) => Err(JsonApiError::forbidden(msg)),
        Err(e) => Err(internal("upsert_profile", e)),
    }
}

#[utoipa::path(get, path = "/api/business/profiles", tag = "business", responses((status = 200, description = "All profiles with owner names", body = [crate::openapi::ProfileWithOwnerDoc])))]
pub async fn list_profiles(State(state): State<ServerState>) -> Result<Json<Vec<ProfileWithOwner>>, JsonApiError> {
    state
        .profile_svc
        .list_profiles()
        .await
        .map(Json)
        .map_err(|e| internal("list_profiles", e))
}

#[utoipa::path(get, path = "/api/business/profile/me", tag = "business", security(("bearer" = [])), responses((status = 200, description = "Caller's profile", body = crate::openapi::BusinessProfileDoc), (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)))]
pub async fn own_profile(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<BusinessProfile>, JsonApiError> {
    match state.profile_svc.get_own_profile(&caller(&claims)).await {
        Ok(profile) => Ok(Json(profile)),
        Err(ServiceError::NotFound(msg)) => Err(JsonApiError::not_found(msg)),
        Err(ServiceError::Forbidden(msg)) => Err(JsonApiError::forbidden(msg)),
        Err(e) => Err(internal("own_profile", e)),
    }
}

#[utoipa::path(get, path = "/api/business/profile/{userId}", tag = "business", params(("userId" = String, Path, description = "Owner user id")), responses((status = 200, description = "Profile with owner name", body = crate::openapi::ProfileWithOwnerDoc), (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)))]
pub async fn profile_by_owner(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
) -> Result<Json<ProfileWithOwner>, JsonApiError> {
    let user_id = owner_id(&raw)?;
    match state.profile_svc.get_profile_by_owner(user_id).await {
        Ok(found) => Ok(Json(found)),
        Err(ServiceError::NotFound(msg)) => Err(JsonApiError::not_found(msg)),
        Err(e) => Err(internal("profile_by_owner", e)),
    }
}

#[utoipa::path(get, path = "/api/business/search", tag = "business", params(("name" = Option<String>, Query, description = "Case-insensitive substring of the business name"), ("type" = Option<String>, Query, description = "Exact incorporation type"), ("sortBy" = Option<String>, Query, description = "revenue (default), cagr, roi or profitMargin"), ("industry" = Option<String>, Query, description = "Accepted, not applied"), ("location" = Option<String>, Query, description = "Accepted, not applied")), responses((status = 200, description = "Matching profiles", body = [crate::openapi::ProfileWithOwnerDoc])))]
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProfileWithOwner>>, JsonApiError> {
    state
        .profile_svc
        .search(query)
        .await
        .map(Json)
        .map_err(|e| internal("search", e))
}

#[utoipa::path(get, path = "/api/business/financials/me", tag = "business", security(("bearer" = [])), responses((status = 200, description = "Caller's revenue series", body = [crate::openapi::RevenueEntryDoc]), (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)))]
pub async fn own_financials(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<RevenueSeries>, JsonApiError> {
    match state.profile_svc.get_own_financials(&caller(&claims)).await {
        Ok(series) => Ok(Json(series)),
        Err(ServiceError::NotFound(msg)) => Err(JsonApiError::not_found(msg)),
        Err(ServiceError::Forbidden(msg)) => Err(JsonApiError::forbidden(msg)),
        Err(e) => Err(internal("own_financials", e)),
    }
}

#[utoipa::path(post, path = "/api/business/financials", tag = "business", request_body = crate::openapi::FinancialStatsDoc, security(("bearer" = [])), responses((status = 200, description = "Stats block replaced", body = crate::openapi::FinancialsUpdatedDoc), (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)))]
pub async fn replace_financials(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<FinancialStats>, JsonRejection>,
) -> Result<Json<FinancialsUpdated>, JsonApiError> {
    let stats = json_body(payload)?;
    match state.profile_svc.replace_financial_stats(&caller(&claims), stats).await {
        Ok(financial_stats) => Ok(Json(FinancialsUpdated { message: "Financial stats updated".into(), financial_stats })),
        Err(ServiceError::NotFound(msg)) => Err(JsonApiError::not_found(msg)),
        Err(ServiceError::Forbidden(msg)) => Err(JsonApiError::forbidden(msg)),
        Err(e) => Err(internal("replace_financials", e)),
    }
}

/// Body is `null` when the profile exists without a stats block.
#[utoipa::path(get, path = "/api/business/financials/{userId}", tag = "business", params(("userId" = String, Path, description = "Owner user id")), responses((status = 200, description = "Financial stats block", body = crate::openapi::FinancialStatsDoc), (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)))]
pub async fn financials_by_owner(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
) -> Result<Json<Option<FinancialStats>>, JsonApiError> {
    let user_id = owner_id(&raw)?;
    match state.profile_svc.get_financials_by_owner(user_id).await {
        Ok(stats) => Ok(Json(stats)),
        Err(ServiceError::NotFound(msg)) => Err(JsonApiError::not_found(msg)),
        Err(e) => Err(internal("financials_by_owner", e)),
    }
}
