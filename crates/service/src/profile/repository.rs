use async_trait::async_trait;
use uuid::Uuid;

use models::business_profile::{NewBusinessProfile, SearchFilter};

use super::domain::{BusinessProfile, ProfileWithOwner};
use crate::errors::ServiceError;

/// Repository abstraction for business profile persistence.
///
/// `insert` must report a second profile for the same owner as `ServiceError::Conflict`.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<BusinessProfile>, ServiceError>;
    async fn find_by_owner_with_owner(&self, user_id: Uuid) -> Result<Option<ProfileWithOwner>, ServiceError>;
    async fn insert(&self, new: NewBusinessProfile) -> Result<BusinessProfile, ServiceError>;
    async fn save(&self, profile: BusinessProfile) -> Result<BusinessProfile, ServiceError>;
    /// Matching profiles joined with their owners, in insertion order.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProfileWithOwner>, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use crate::auth::repository::mock::MockAuthRepository;
    use crate::profile::domain::{OwnerSummary, ProductsAndServices};

    #[derive(Default)]
    pub struct MockProfileRepository {
        profiles: Mutex<Vec<BusinessProfile>>,
        users: Option<Arc<MockAuthRepository>>,
    }

    impl MockProfileRepository {
        pub fn new() -> Self { Self::default() }

        /// Owner names are joined from the given auth repository.
        pub fn with_users(users: Arc<MockAuthRepository>) -> Self {
            Self { profiles: Mutex::new(Vec::new()), users: Some(users) }
        }

        pub fn count_by_owner(&self, user_id: Uuid) -> usize {
            self.profiles.lock().unwrap().iter().filter(|p| p.user_id == user_id).count()
        }

        fn join(&self, profile: BusinessProfile) -> ProfileWithOwner {
            let user = self
                .users
                .as_ref()
                .and_then(|u| u.user_by_id(profile.user_id))
                .map(|u| OwnerSummary { id: u.id, name: u.name });
            ProfileWithOwner { profile, user }
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<BusinessProfile>, ServiceError> {
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
        }

        async fn find_by_owner_with_owner(&self, user_id: Uuid) -> Result<Option<ProfileWithOwner>, ServiceError> {
            let found = self.find_by_owner(user_id).await?;
            Ok(found.map(|p| self.join(p)))
        }

        async fn insert(&self, new: NewBusinessProfile) -> Result<BusinessProfile, ServiceError> {
            models::business_profile::validate_required(&new.business_name, &new.incorporation_type)?;
            let mut profiles = self.profiles.lock().unwrap();
            if profiles.iter().any(|p| p.user_id == new.user_id) {
                return Err(ServiceError::Conflict("duplicate key value violates unique constraint on user_id".into()));
            }
            let now = Utc::now().fixed_offset();
            let ProductsAndServices(products_and_services) = new.products_and_services;
            let profile = BusinessProfile {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                incorporation_type: new.incorporation_type,
                business_name: new.business_name,
                description: new.description,
                contact: new.contact,
                products_and_services,
                financial_stats: new.financial_stats,
                created_at: now,
                updated_at: now,
            };
            profiles.push(profile.clone());
            Ok(profile)
        }

        async fn save(&self, mut profile: BusinessProfile) -> Result<BusinessProfile, ServiceError> {
            models::business_profile::validate_required(&profile.business_name, &profile.incorporation_type)?;
            let mut profiles = self.profiles.lock().unwrap();
            let slot = profiles
                .iter_mut()
                .find(|p| p.id == profile.id)
                .ok_or_else(|| ServiceError::not_found("Profile"))?;
            profile.updated_at = Utc::now().fixed_offset();
            *slot = profile.clone();
            Ok(profile)
        }

        async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProfileWithOwner>, ServiceError> {
            let needle = filter.name.as_deref().filter(|n| !n.is_empty()).map(str::to_lowercase);
            let kind = filter.incorporation_type.as_deref().filter(|t| !t.is_empty());
            let matched: Vec<BusinessProfile> = self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .filter(|p| needle.as_ref().map_or(true, |n| p.business_name.to_lowercase().contains(n.as_str())))
                .filter(|p| kind.map_or(true, |k| p.incorporation_type == k))
                .cloned()
                .collect();
            Ok(matched.into_iter().map(|p| self.join(p)).collect())
        }
    }
}
