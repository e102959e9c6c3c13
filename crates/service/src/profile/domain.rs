use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::business_profile::{Model, NewBusinessProfile};
pub use models::business_profile::{Contact, FinancialStats, ProductOrService, ProductsAndServices, RevenueEntry, RevenueSeries};
pub use models::user::Role;

use crate::errors::ServiceError;

/// Identity attached to a request after token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: Uuid, role: Role) -> Self { Self { user_id, role } }

    pub fn require(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Access denied".into()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub incorporation_type: String,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub products_and_services: Vec<ProductOrService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_stats: Option<FinancialStats>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Model> for BusinessProfile {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            incorporation_type: m.incorporation_type,
            business_name: m.business_name,
            description: m.description,
            contact: m.contact,
            products_and_services: m.products_and_services.0,
            financial_stats: m.financial_stats,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<BusinessProfile> for Model {
    fn from(p: BusinessProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            incorporation_type: p.incorporation_type,
            business_name: p.business_name,
            description: p.description,
            contact: p.contact,
            products_and_services: ProductsAndServices(p.products_and_services),
            financial_stats: p.financial_stats,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Profile write payload. Only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_and_services: Option<Vec<ProductOrService>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_stats: Option<FinancialStats>,
}

impl ProfileInput {
    /// Top-level field merge: nested blocks are replaced whole, absent fields are kept.
    pub fn merge_into(self, mut profile: BusinessProfile) -> BusinessProfile {
        if let Some(v) = self.incorporation_type { profile.incorporation_type = v; }
        if let Some(v) = self.business_name { profile.business_name = v; }
        if let Some(v) = self.description { profile.description = Some(v); }
        if let Some(v) = self.contact { profile.contact = Some(v); }
        if let Some(v) = self.products_and_services { profile.products_and_services = v; }
        if let Some(v) = self.financial_stats { profile.financial_stats = Some(v); }
        profile
    }

    pub fn into_new(self, user_id: Uuid) -> NewBusinessProfile {
        NewBusinessProfile {
            user_id,
            incorporation_type: self.incorporation_type.unwrap_or_default(),
            business_name: self.business_name.unwrap_or_default(),
            description: self.description,
            contact: self.contact,
            products_and_services: ProductsAndServices(self.products_and_services.unwrap_or_default()),
            financial_stats: self.financial_stats,
        }
    }
}

/// Owner fields joined into public reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWithOwner {
    #[serde(flatten)]
    pub profile: BusinessProfile,
    pub user: Option<OwnerSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
