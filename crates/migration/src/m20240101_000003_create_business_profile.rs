//! Create `business_profile` table, one row per owning user.
//!
//! `user_id` is UNIQUE: a second concurrent first-write for the same owner fails
//! at the store instead of producing a duplicate. Nested blocks are `jsonb`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessProfile::Table)
                    .if_not_exists()
                    .col(uuid(BusinessProfile::Id).primary_key())
                    .col(uuid(BusinessProfile::UserId).unique_key().not_null())
                    .col(string_len(BusinessProfile::IncorporationType, 64).not_null())
                    .col(string_len(BusinessProfile::BusinessName, 255).not_null())
                    .col(text_null(BusinessProfile::Description))
                    .col(json_binary_null(BusinessProfile::Contact))
                    .col(json_binary(BusinessProfile::ProductsAndServices).not_null())
                    .col(json_binary_null(BusinessProfile::FinancialStats))
                    .col(timestamp_with_time_zone(BusinessProfile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BusinessProfile::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_profile_user")
                            .from(BusinessProfile::Table, BusinessProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BusinessProfile {
    Table,
    Id,
    UserId,
    IncorporationType,
    BusinessName,
    Description,
    Contact,
    ProductsAndServices,
    FinancialStats,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
