//! OpenAPI document. The `*Doc` types mirror the wire shapes of the service types
//! so the service crate stays free of documentation derives.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `general` (default) or `business`
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: Uuid, pub name: String, pub email: String, pub role: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub token: String, pub user: UserDoc }

#[derive(ToSchema)]
pub struct ContactDoc {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

#[derive(ToSchema)]
pub struct ProductOrServiceDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

/// Index 0 is the most recent entry.
#[derive(ToSchema)]
pub struct RevenueEntryDoc { pub year: Option<i32>, pub amount: Option<f64> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct FinancialStatsDoc {
    pub revenue: Option<Vec<RevenueEntryDoc>>,
    pub cagr: Option<f64>,
    pub roi: Option<f64>,
    pub profit_margin: Option<f64>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProfileInputDoc {
    pub incorporation_type: Option<String>,
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub contact: Option<ContactDoc>,
    pub products_and_services: Option<Vec<ProductOrServiceDoc>>,
    pub financial_stats: Option<FinancialStatsDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BusinessProfileDoc {
    pub id: Uuid,
    pub user_id: Uuid,
    pub incorporation_type: String,
    pub business_name: String,
    pub description: Option<String>,
    pub contact: Option<ContactDoc>,
    pub products_and_services: Vec<ProductOrServiceDoc>,
    pub financial_stats: Option<FinancialStatsDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct OwnerDoc { pub id: Uuid, pub name: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProfileWithOwnerDoc {
    pub id: Uuid,
    pub user_id: Uuid,
    pub incorporation_type: String,
    pub business_name: String,
    pub description: Option<String>,
    pub contact: Option<ContactDoc>,
    pub products_and_services: Vec<ProductOrServiceDoc>,
    pub financial_stats: Option<FinancialStatsDoc>,
    pub created_at: String,
    pub updated_at: String,
    pub user: Option<OwnerDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct FinancialsUpdatedDoc { pub message: String, pub financial_stats: FinancialStatsDoc }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::business::upsert_profile,
        crate::routes::business::list_profiles,
        crate::routes::business::own_profile,
        crate::routes::business::profile_by_owner,
        crate::routes::business::search,
        crate::routes::business::own_financials,
        crate::routes::business::replace_financials,
        crate::routes::business::financials_by_owner,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            RegisterRequest,
            LoginRequest,
            UserDoc,
            LoginResponse,
            ContactDoc,
            ProductOrServiceDoc,
            RevenueEntryDoc,
            FinancialStatsDoc,
            ProfileInputDoc,
            BusinessProfileDoc,
            OwnerDoc,
            ProfileWithOwnerDoc,
            FinancialsUpdatedDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "business")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_business_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/business/profile", "/api/business/search", "/api/business/financials/{userId}", "/api/auth/login"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
