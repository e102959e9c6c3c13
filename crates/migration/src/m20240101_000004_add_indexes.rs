use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Search: exact match on incorporation type
        manager
            .create_index(
                Index::create()
                    .name("idx_business_profile_incorporation_type")
                    .table(BusinessProfile::Table)
                    .col(BusinessProfile::IncorporationType)
                    .to_owned(),
            )
            .await?;

        // Default listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_business_profile_created_at")
                    .table(BusinessProfile::Table)
                    .col(BusinessProfile::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_business_profile_incorporation_type").table(BusinessProfile::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_business_profile_created_at").table(BusinessProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BusinessProfile { Table, IncorporationType, CreatedAt }
