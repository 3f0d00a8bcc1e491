use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::map_sqlx_err;
use crate::application::ports::{CoachRepository, RepositoryError};
use crate::domain::{AbilityMap, CoachProfile, UserId};

pub struct PgCoachRepository {
    pool: PgPool,
}

impl PgCoachRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoachRepository for PgCoachRepository {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_profile(
        &self,
        user_id: UserId,
    ) -> Result<Option<CoachProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, target_role, goals, preferences, updated_at FROM coach_agent_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(|r| {
            Ok(CoachProfile {
                user_id: UserId::from_uuid(r.try_get("user_id").map_err(map_sqlx_err)?),
                target_role: r.try_get("target_role").map_err(map_sqlx_err)?,
                goals: r.try_get("goals").map_err(map_sqlx_err)?,
                preferences: r.try_get("preferences").map_err(map_sqlx_err)?,
                updated_at: r.try_get("updated_at").map_err(map_sqlx_err)?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn upsert_profile(&self, profile: &CoachProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO coach_agent_profiles (user_id, target_role, goals, preferences, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET target_role = EXCLUDED.target_role,
                goals = EXCLUDED.goals,
                preferences = EXCLUDED.preferences,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.target_role)
        .bind(&profile.goals)
        .bind(&profile.preferences)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_ability_map(
        &self,
        user_id: UserId,
    ) -> Result<Option<AbilityMap>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, scores, updated_at FROM ability_maps WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(|r| {
            Ok(AbilityMap {
                user_id: UserId::from_uuid(r.try_get("user_id").map_err(map_sqlx_err)?),
                scores: r.try_get("scores").map_err(map_sqlx_err)?,
                updated_at: r.try_get("updated_at").map_err(map_sqlx_err)?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, map), fields(user_id = %map.user_id))]
    async fn upsert_ability_map(&self, map: &AbilityMap) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ability_maps (user_id, scores, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET scores = EXCLUDED.scores,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(map.user_id.as_uuid())
        .bind(&map.scores)
        .bind(map.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }
}
