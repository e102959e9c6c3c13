use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, FromJsonQueryResult, PaginatorTrait, QueryOrder, Set, DatabaseConnection};
use sea_orm::sea_query::{BinOper, Expr, Func};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, user};

/// Contact block; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
}

/// Ordered product/service list, kept in the order the client sent it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ProductsAndServices(pub Vec<ProductOrService>);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Revenue history, most recent entry first.
///
/// Index 0 is the latest figure by convention of the writer; nothing here
/// reorders or validates years. Ranking by revenue reads [`RevenueSeries::latest`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevenueSeries(pub Vec<RevenueEntry>);

impl RevenueSeries {
    pub fn latest(&self) -> Option<&RevenueEntry> {
        self.0.first()
    }

    pub fn latest_amount(&self) -> Option<f64> {
        self.latest().and_then(|e| e.amount)
    }
}

/// Financial stats block. Written wholesale; absent fields are simply not stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cagr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub incorporation_type: String,
    pub business_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub contact: Option<Contact>,
    #[sea_orm(column_type = "JsonBinary")]
    pub products_and_services: ProductsAndServices,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub financial_stats: Option<FinancialStats>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::UserId",
        to = "crate::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields required to create a profile row.
#[derive(Clone, Debug, Default)]
pub struct NewBusinessProfile {
    pub user_id: Uuid,
    pub incorporation_type: String,
    pub business_name: String,
    pub description: Option<String>,
    pub contact: Option<Contact>,
    pub products_and_services: ProductsAndServices,
    pub financial_stats: Option<FinancialStats>,
}

/// Search filters applied in SQL. Empty filter matches every row.
#[derive(Clone, Debug, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring of the business name
    pub name: Option<String>,
    /// Exact incorporation type
    pub incorporation_type: Option<String>,
}

pub fn validate_required(business_name: &str, incorporation_type: &str) -> Result<(), ModelError> {
    let mut missing = Vec::new();
    if business_name.trim().is_empty() { missing.push("businessName"); }
    if incorporation_type.trim().is_empty() { missing.push("incorporationType"); }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("business profile validation failed: {} is required", missing.join(", "))))
    }
}

/// Escape LIKE metacharacters so the name filter is a plain substring match.
/// Case is left alone; the query folds both sides with `lower()`.
pub fn like_contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

pub async fn create(db: &DatabaseConnection, new: NewBusinessProfile) -> Result<Model, ModelError> {
    validate_required(&new.business_name, &new.incorporation_type)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        incorporation_type: Set(new.incorporation_type),
        business_name: Set(new.business_name),
        description: Set(new.description),
        contact: Set(new.contact),
        products_and_services: Set(new.products_and_services),
        financial_stats: Set(new.financial_stats),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Write every mutable column of `m` back to its row.
pub async fn save(db: &DatabaseConnection, m: Model) -> Result<Model, ModelError> {
    validate_required(&m.business_name, &m.incorporation_type)?;
    let am = ActiveModel {
        id: Unchanged(m.id),
        user_id: Unchanged(m.user_id),
        incorporation_type: Set(m.incorporation_type),
        business_name: Set(m.business_name),
        description: Set(m.description),
        contact: Set(m.contact),
        products_and_services: Set(m.products_and_services),
        financial_stats: Set(m.financial_stats),
        created_at: Unchanged(m.created_at),
        updated_at: Set(Utc::now().into()),
    };
    Ok(am.update(db).await?)
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub async fn find_by_user_with_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<(Model, Option<user::Model>)>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .find_also_related(user::Entity)
        .one(db)
        .await?)
}

/// Filtered listing joined with owners, in insertion order.
pub async fn search(db: &DatabaseConnection, filter: &SearchFilter) -> Result<Vec<(Model, Option<user::Model>)>, ModelError> {
    let mut query = Entity::find();
    if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
        // backslash is the default LIKE escape in Postgres
        query = query.filter(
            Expr::expr(Func::lower(Expr::col((Entity, Column::BusinessName))))
                .binary(BinOper::Like, Func::lower(Expr::val(like_contains_pattern(name)))),
        );
    }
    if let Some(kind) = filter.incorporation_type.as_deref().filter(|t| !t.is_empty()) {
        query = query.filter(Column::IncorporationType.eq(kind));
    }
    Ok(query
        .find_also_related(user::Entity)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn count_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).count(db).await?)
}
