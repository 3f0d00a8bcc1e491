use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{User, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user. A duplicate email surfaces as
    /// `RepositoryError::ConstraintViolation`.
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Applies a partial profile update and returns the stored document, or
    /// `None` when the user row is gone.
    async fn update_profile(
        &self,
        id: UserId,
        name: Option<String>,
        profile: Option<serde_json::Value>,
    ) -> Result<Option<User>, RepositoryError>;

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), RepositoryError>;
}
