use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{InterviewKind, InterviewSession, SessionId};

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn create(&self, session: &InterviewSession) -> Result<(), RepositoryError>;

    async fn find(
        &self,
        kind: InterviewKind,
        id: SessionId,
    ) -> Result<Option<InterviewSession>, RepositoryError>;

    /// Appends one entry to the session's submissions array. Uses the
    /// store's atomic array-append primitive; concurrent appends interleave
    /// with no dedup and no further serialization.
    async fn append_submission(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError>;

    async fn append_feedback(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError>;

    /// Flips the session to completed and stamps `completed_at`.
    async fn complete(
        &self,
        kind: InterviewKind,
        id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}
