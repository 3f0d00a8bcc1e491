use sqlx::PgPool;
use tracing::instrument;

use super::map_sqlx_err;
use crate::application::ports::RepositoryError;

const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        profile JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL,
        last_login_at TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS coding_questions (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS system_design_questions (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS behavioral_questions (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS llm_questions (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS coding_interviews (
        session_id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        mode TEXT NOT NULL DEFAULT 'practice',
        question_data JSONB NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        submissions JSONB NOT NULL DEFAULT '[]'::jsonb,
        feedback JSONB NOT NULL DEFAULT '[]'::jsonb,
        started_at TIMESTAMPTZ NOT NULL,
        completed_at TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS behavioral_interviews (
        session_id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        mode TEXT NOT NULL DEFAULT 'practice',
        question_data JSONB NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        submissions JSONB NOT NULL DEFAULT '[]'::jsonb,
        feedback JSONB NOT NULL DEFAULT '[]'::jsonb,
        started_at TIMESTAMPTZ NOT NULL,
        completed_at TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS system_design_interviews (
        session_id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        mode TEXT NOT NULL DEFAULT 'practice',
        question_data JSONB NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        submissions JSONB NOT NULL DEFAULT '[]'::jsonb,
        feedback JSONB NOT NULL DEFAULT '[]'::jsonb,
        started_at TIMESTAMPTZ NOT NULL,
        completed_at TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS user_learning_history (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        question_id UUID NOT NULL,
        category TEXT NOT NULL,
        feedback JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS user_learning_history_user_idx
        ON user_learning_history (user_id, created_at DESC)"#,
    r#"CREATE TABLE IF NOT EXISTS user_interview_history (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        kind TEXT NOT NULL,
        report JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS user_interview_history_user_idx
        ON user_interview_history (user_id, created_at DESC)"#,
    r#"CREATE TABLE IF NOT EXISTS coach_agent_profiles (
        user_id UUID PRIMARY KEY,
        target_role TEXT NOT NULL,
        goals TEXT[] NOT NULL DEFAULT '{}',
        preferences JSONB NOT NULL DEFAULT '{}'::jsonb,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS ability_maps (
        user_id UUID PRIMARY KEY,
        scores JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
];

/// Creates the collections on startup when they are missing. Intentionally
/// idempotent and additive only; this is not a migration system.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(map_sqlx_err)?;
    }
    tracing::info!("Store schema verified");
    Ok(())
}
