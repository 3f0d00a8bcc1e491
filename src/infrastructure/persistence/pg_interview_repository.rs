use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::map_sqlx_err;
use crate::application::ports::{InterviewRepository, RepositoryError};
use crate::domain::{
    InterviewKind, InterviewSession, SessionId, SessionMode, SessionStatus, UserId,
};

pub struct PgInterviewRepository {
    pool: PgPool,
}

impl PgInterviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn json_array(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Array(entries) => entries,
        _ => Vec::new(),
    }
}

fn row_to_session(
    row: &sqlx::postgres::PgRow,
    kind: InterviewKind,
) -> Result<InterviewSession, RepositoryError> {
    let status: String = row.try_get("status").map_err(map_sqlx_err)?;
    let status = status
        .parse::<SessionStatus>()
        .map_err(RepositoryError::QueryFailed)?;
    let mode: String = row.try_get("mode").map_err(map_sqlx_err)?;
    let mode = mode
        .parse::<SessionMode>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(InterviewSession {
        id: SessionId::from_uuid(row.try_get("session_id").map_err(map_sqlx_err)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(map_sqlx_err)?),
        kind,
        mode,
        question_data: row.try_get("question_data").map_err(map_sqlx_err)?,
        status,
        submissions: json_array(row.try_get("submissions").map_err(map_sqlx_err)?),
        feedback: json_array(row.try_get("feedback").map_err(map_sqlx_err)?),
        started_at: row.try_get("started_at").map_err(map_sqlx_err)?,
        completed_at: row.try_get("completed_at").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl InterviewRepository for PgInterviewRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, kind = %session.kind))]
    async fn create(&self, session: &InterviewSession) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (session_id, user_id, mode, question_data, status, submissions, feedback, started_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            session.kind.table()
        ))
        .bind(session.id.as_uuid())
        .bind(session.user_id.as_uuid())
        .bind(session.mode.as_str())
        .bind(&session.question_data)
        .bind(session.status.as_str())
        .bind(serde_json::Value::Array(session.submissions.clone()))
        .bind(serde_json::Value::Array(session.feedback.clone()))
        .bind(session.started_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id, kind = %kind))]
    async fn find(
        &self,
        kind: InterviewKind,
        id: SessionId,
    ) -> Result<Option<InterviewSession>, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT session_id, user_id, mode, question_data, status, submissions, feedback,
                   started_at, completed_at
            FROM {}
            WHERE session_id = $1
            "#,
            kind.table()
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.as_ref().map(|r| row_to_session(r, kind)).transpose()
    }

    #[instrument(skip(self, entry), fields(session_id = %id, kind = %kind))]
    async fn append_submission(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        // jsonb `||` is the store's atomic array-append; concurrent appends
        // interleave without loss but with no ordering guarantee.
        let result = sqlx::query(&format!(
            "UPDATE {} SET submissions = submissions || jsonb_build_array($2::jsonb) WHERE session_id = $1",
            kind.table()
        ))
        .bind(id.as_uuid())
        .bind(entry)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("session {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self, entry), fields(session_id = %id, kind = %kind))]
    async fn append_feedback(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET feedback = feedback || jsonb_build_array($2::jsonb) WHERE session_id = $1",
            kind.table()
        ))
        .bind(id.as_uuid())
        .bind(entry)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("session {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id, kind = %kind))]
    async fn complete(
        &self,
        kind: InterviewKind,
        id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET status = 'completed', completed_at = $2 WHERE session_id = $1",
            kind.table()
        ))
        .bind(id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("session {}", id)));
        }
        Ok(())
    }
}
