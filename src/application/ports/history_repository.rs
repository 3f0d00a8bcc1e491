use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{HistoryRecordId, InterviewReport, LearningRecord, UserId};

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn append_learning(&self, record: &LearningRecord) -> Result<(), RepositoryError>;

    /// The user's learning history, newest first.
    async fn list_learning(&self, user_id: UserId) -> Result<Vec<LearningRecord>, RepositoryError>;

    /// Deletes one record if it exists AND belongs to `user_id`. Returns
    /// `false` otherwise so the caller can answer 404 without leaking whether
    /// the record exists under another owner.
    async fn delete_learning(
        &self,
        id: HistoryRecordId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError>;

    async fn append_interview(&self, report: &InterviewReport) -> Result<(), RepositoryError>;

    async fn list_interviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<InterviewReport>, RepositoryError>;
}
