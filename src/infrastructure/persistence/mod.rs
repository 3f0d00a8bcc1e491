pub mod memory;
mod pg_coach_repository;
mod pg_history_repository;
mod pg_interview_repository;
mod pg_pool;
mod pg_question_repository;
mod pg_store_health;
mod pg_user_repository;
mod schema;

pub use pg_coach_repository::PgCoachRepository;
pub use pg_history_repository::PgHistoryRepository;
pub use pg_interview_repository::PgInterviewRepository;
pub use pg_pool::create_pool;
pub use pg_question_repository::PgQuestionRepository;
pub use pg_store_health::PgStoreHealth;
pub use pg_user_repository::PgUserRepository;
pub use schema::ensure_schema;

use crate::application::ports::RepositoryError;

pub(crate) fn map_sqlx_err(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Unavailable(e.to_string())
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound(e.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::ConstraintViolation(db.to_string())
        }
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
