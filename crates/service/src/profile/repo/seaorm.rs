use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::business_profile::{self as bp, NewBusinessProfile, SearchFilter};

use crate::errors::ServiceError;
use crate::profile::domain::{BusinessProfile, OwnerSummary, ProfileWithOwner};
use crate::profile::repository::ProfileRepository;

pub struct SeaOrmProfileRepository {
    pub db: DatabaseConnection,
}

fn joined(profile: bp::Model, owner: Option<models::user::Model>) -> ProfileWithOwner {
    ProfileWithOwner {
        profile: profile.into(),
        user: owner.map(|u| OwnerSummary { id: u.id, name: u.name }),
    }
}

#[async_trait::async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<BusinessProfile>, ServiceError> {
        Ok(bp::find_by_user(&self.db, user_id).await?.map(Into::into))
    }

    async fn find_by_owner_with_owner(&self, user_id: Uuid) -> Result<Option<ProfileWithOwner>, ServiceError> {
        let found = bp::find_by_user_with_owner(&self.db, user_id).await?;
        Ok(found.map(|(p, u)| joined(p, u)))
    }

    async fn insert(&self, new: NewBusinessProfile) -> Result<BusinessProfile, ServiceError> {
        Ok(bp::create(&self.db, new).await?.into())
    }

    async fn save(&self, profile: BusinessProfile) -> Result<BusinessProfile, ServiceError> {
        Ok(bp::save(&self.db, profile.into()).await?.into())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProfileWithOwner>, ServiceError> {
        let rows = bp::search(&self.db, filter).await?;
        Ok(rows.into_iter().map(|(p, u)| joined(p, u)).collect())
    }
}
