use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::map_sqlx_err;
use crate::application::ports::{QuestionFilter, QuestionRepository, RepositoryError};
use crate::domain::{Difficulty, Question, QuestionCategory, QuestionId};

const DEFAULT_LIST_LIMIT: i64 = 50;

pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_question(
    row: &sqlx::postgres::PgRow,
    category: QuestionCategory,
) -> Result<Question, RepositoryError> {
    let difficulty: String = row.try_get("difficulty").map_err(map_sqlx_err)?;
    let difficulty = difficulty
        .parse::<Difficulty>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(Question {
        id: QuestionId::from_uuid(row.try_get("id").map_err(map_sqlx_err)?),
        title: row.try_get("title").map_err(map_sqlx_err)?,
        description: row.try_get("description").map_err(map_sqlx_err)?,
        difficulty,
        category,
        tags: row.try_get("tags").map_err(map_sqlx_err)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    #[instrument(skip(self, questions), fields(count = questions.len()))]
    async fn insert_many(&self, questions: &[Question]) -> Result<(), RepositoryError> {
        for question in questions {
            sqlx::query(&format!(
                r#"
                INSERT INTO {} (id, title, description, difficulty, tags, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
                question.category.table()
            ))
            .bind(question.id.as_uuid())
            .bind(&question.title)
            .bind(&question.description)
            .bind(question.difficulty.as_str())
            .bind(&question.tags)
            .bind(question.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        }

        Ok(())
    }

    #[instrument(skip(self), fields(category = %category, question_id = %id))]
    async fn find(
        &self,
        category: QuestionCategory,
        id: QuestionId,
    ) -> Result<Option<Question>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT id, title, description, difficulty, tags, created_at FROM {} WHERE id = $1",
            category.table()
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.as_ref().map(|r| row_to_question(r, category)).transpose()
    }

    #[instrument(skip(self, filter), fields(category = %category))]
    async fn list(
        &self,
        category: QuestionCategory,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, RepositoryError> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT);

        let rows = sqlx::query(&format!(
            r#"
            SELECT id, title, description, difficulty, tags, created_at
            FROM {}
            WHERE ($1::text IS NULL OR difficulty = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            category.table()
        ))
        .bind(filter.difficulty.as_deref())
        .bind(filter.tag.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|r| row_to_question(r, category))
            .collect()
    }
}
