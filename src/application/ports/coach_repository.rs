use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{AbilityMap, CoachProfile, UserId};

#[async_trait]
pub trait CoachRepository: Send + Sync {
    async fn get_profile(&self, user_id: UserId)
        -> Result<Option<CoachProfile>, RepositoryError>;

    async fn upsert_profile(&self, profile: &CoachProfile) -> Result<(), RepositoryError>;

    async fn get_ability_map(&self, user_id: UserId)
        -> Result<Option<AbilityMap>, RepositoryError>;

    async fn upsert_ability_map(&self, map: &AbilityMap) -> Result<(), RepositoryError>;
}
