use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::business_profile::SearchFilter;

use super::domain::{BusinessProfile, Caller, FinancialStats, ProfileInput, ProfileWithOwner, RevenueSeries, Role, UpsertOutcome};
use super::repository::ProfileRepository;
use super::search::{sort_profiles, SearchQuery, SortKey};
use crate::errors::ServiceError;

/// Profile business service independent of web framework
pub struct ProfileService<R: ProfileRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ProfileRepository + ?Sized> ProfileService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create the caller's profile, or merge the payload into the existing one.
    ///
    /// # Examples
    /// ```
    /// use service::profile::{ProfileService, repository::mock::MockProfileRepository};
    /// use service::profile::domain::{Caller, ProfileInput, Role, UpsertOutcome};
    /// use std::sync::Arc;
    /// let svc = ProfileService::new(Arc::new(MockProfileRepository::new()));
    /// let caller = Caller::new(uuid::Uuid::new_v4(), Role::Business);
    /// let input = ProfileInput { business_name: Some("Acme".into()), incorporation_type: Some("LLC".into()), ..Default::default() };
    /// let (_, first) = tokio_test::block_on(svc.upsert_own_profile(&caller, input.clone())).unwrap();
    /// let (_, second) = tokio_test::block_on(svc.upsert_own_profile(&caller, input)).unwrap();
    /// assert_eq!((first, second), (UpsertOutcome::Created, UpsertOutcome::Updated));
    /// ```
    #[instrument(skip(self, input), fields(user_id = %caller.user_id))]
    pub async fn upsert_own_profile(&self, caller: &Caller, input: ProfileInput) -> Result<(BusinessProfile, UpsertOutcome), ServiceError> {
        caller.require(Role::Business)?;

        if let Some(existing) = self.repo.find_by_owner(caller.user_id).await? {
            let saved = self.repo.save(input.merge_into(existing)).await?;
            info!(profile_id = %saved.id, "profile_updated");
            return Ok((saved, UpsertOutcome::Updated));
        }

        match self.repo.insert(input.clone().into_new(caller.user_id)).await {
            Ok(created) => {
                info!(profile_id = %created.id, "profile_created");
                Ok((created, UpsertOutcome::Created))
            }
            Err(ServiceError::Conflict(msg)) => {
                // Lost the first-write race: the unique owner key already holds the winner's row.
                warn!(err = %msg, "profile_create_conflict_retrying_as_update");
                let existing = self
                    .repo
                    .find_by_owner(caller.user_id)
                    .await?
                    .ok_or_else(|| ServiceError::Conflict(msg))?;
                let saved = self.repo.save(input.merge_into(existing)).await?;
                Ok((saved, UpsertOutcome::Updated))
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the whole financial stats block; nothing from the previous block survives.
    #[instrument(skip(self, stats), fields(user_id = %caller.user_id))]
    pub async fn replace_financial_stats(&self, caller: &Caller, stats: FinancialStats) -> Result<FinancialStats, ServiceError> {
        caller.require(Role::Business)?;
        let mut profile = self
            .repo
            .find_by_owner(caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile"))?;
        profile.financial_stats = Some(stats);
        let saved = self.repo.save(profile).await?;
        info!(profile_id = %saved.id, "financial_stats_replaced");
        Ok(saved.financial_stats.unwrap_or_default())
    }

    pub async fn get_own_profile(&self, caller: &Caller) -> Result<BusinessProfile, ServiceError> {
        caller.require(Role::Business)?;
        self.repo
            .find_by_owner(caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile"))
    }

    pub async fn get_profile_by_owner(&self, user_id: Uuid) -> Result<ProfileWithOwner, ServiceError> {
        self.repo
            .find_by_owner_with_owner(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile"))
    }

    /// Revenue series of the caller's own profile.
    pub async fn get_own_financials(&self, caller: &Caller) -> Result<RevenueSeries, ServiceError> {
        caller.require(Role::Business)?;
        self.repo
            .find_by_owner(caller.user_id)
            .await?
            .and_then(|p| p.financial_stats)
            .and_then(|s| s.revenue)
            .ok_or_else(|| ServiceError::not_found("Revenue data"))
    }

    /// `Ok(None)` when the profile exists but has never had stats written.
    pub async fn get_financials_by_owner(&self, user_id: Uuid) -> Result<Option<FinancialStats>, ServiceError> {
        let profile = self
            .repo
            .find_by_owner(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Business profile"))?;
        Ok(profile.financial_stats)
    }

    pub async fn list_profiles(&self) -> Result<Vec<ProfileWithOwner>, ServiceError> {
        self.repo.search(&SearchFilter::default()).await
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Vec<ProfileWithOwner>, ServiceError> {
        let filter = SearchFilter { name: query.name, incorporation_type: query.incorporation_type };
        let mut found = self.repo.search(&filter).await?;
        if let Some(key) = SortKey::parse(query.sort_by.as_deref()) {
            sort_profiles(&mut found, key);
        }
        Ok(found)
    }
}
