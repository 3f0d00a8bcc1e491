use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::map_sqlx_err;
use crate::application::ports::{HistoryRepository, RepositoryError};
use crate::domain::{
    HistoryRecordId, InterviewKind, InterviewReport, LearningRecord, QuestionCategory, QuestionId,
    UserId,
};

pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_learning(row: &sqlx::postgres::PgRow) -> Result<LearningRecord, RepositoryError> {
    let category: String = row.try_get("category").map_err(map_sqlx_err)?;
    let category = category
        .parse::<QuestionCategory>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(LearningRecord {
        id: HistoryRecordId::from_uuid(row.try_get("id").map_err(map_sqlx_err)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(map_sqlx_err)?),
        question_id: QuestionId::from_uuid(row.try_get("question_id").map_err(map_sqlx_err)?),
        category,
        feedback: row.try_get("feedback").map_err(map_sqlx_err)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
    })
}

fn row_to_report(row: &sqlx::postgres::PgRow) -> Result<InterviewReport, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(map_sqlx_err)?;
    let kind = kind
        .parse::<InterviewKind>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(InterviewReport {
        id: HistoryRecordId::from_uuid(row.try_get("id").map_err(map_sqlx_err)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(map_sqlx_err)?),
        kind,
        report: row.try_get("report").map_err(map_sqlx_err)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn append_learning(&self, record: &LearningRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_learning_history (id, user_id, question_id, category, feedback, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(record.question_id.as_uuid())
        .bind(record.category.as_str())
        .bind(&record.feedback)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_learning(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LearningRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, question_id, category, feedback, created_at
            FROM user_learning_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_learning).collect()
    }

    #[instrument(skip(self), fields(record_id = %id, user_id = %user_id))]
    async fn delete_learning(
        &self,
        id: HistoryRecordId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM user_learning_history WHERE id = $1 AND user_id = $2")
                .bind(id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, report), fields(user_id = %report.user_id))]
    async fn append_interview(&self, report: &InterviewReport) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_interview_history (id, user_id, kind, report, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(report.user_id.as_uuid())
        .bind(report.kind.as_str())
        .bind(&report.report)
        .bind(report.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_interviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<InterviewReport>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, kind, report, created_at
            FROM user_interview_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_report).collect()
    }
}
