use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Question, QuestionCategory, QuestionId};

/// Bank listing filters. `difficulty` is matched as raw text so an unmatched
/// value yields an empty list rather than a parse error.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub difficulty: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert_many(&self, questions: &[Question]) -> Result<(), RepositoryError>;

    async fn find(
        &self,
        category: QuestionCategory,
        id: QuestionId,
    ) -> Result<Option<Question>, RepositoryError>;

    /// Newest first.
    async fn list(
        &self,
        category: QuestionCategory,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, RepositoryError>;
}
