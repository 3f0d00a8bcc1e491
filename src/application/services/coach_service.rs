use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::application::ports::{
    CoachRepository, HistoryRepository, LlmClient, LlmClientError, RepositoryError,
};
use crate::application::services::prompts;
use crate::application::services::response_parser::{extract_json_object, MalformedResponse};
use crate::domain::{AbilityMap, CoachProfile, UserId};

pub struct CoachService<L>
where
    L: LlmClient,
{
    llm: Arc<L>,
    coach: Arc<dyn CoachRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl<L> CoachService<L>
where
    L: LlmClient,
{
    pub fn new(
        llm: Arc<L>,
        coach: Arc<dyn CoachRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self { llm, coach, history }
    }

    pub async fn profile(&self, user_id: UserId) -> Result<Option<CoachProfile>, CoachError> {
        Ok(self.coach.get_profile(user_id).await?)
    }

    pub async fn upsert_profile(
        &self,
        user_id: UserId,
        target_role: String,
        goals: Vec<String>,
        preferences: Option<serde_json::Value>,
    ) -> Result<CoachProfile, CoachError> {
        let profile = CoachProfile::new(
            user_id,
            target_role,
            goals,
            preferences.unwrap_or_else(|| json!({})),
        );
        self.coach.upsert_profile(&profile).await?;
        Ok(profile)
    }

    /// Recomputes per-category scores from the learning history and caches
    /// the result. Feedback entries without a numeric `score` still count as
    /// attempts but contribute nothing to the average.
    #[tracing::instrument(skip(self))]
    pub async fn ability_map(&self, user_id: UserId) -> Result<AbilityMap, CoachError> {
        let records = self.history.list_learning(user_id).await?;

        let mut sums: BTreeMap<&'static str, (f64, u32, u32)> = BTreeMap::new();
        for record in &records {
            let slot = sums.entry(record.category.as_str()).or_insert((0.0, 0, 0));
            slot.2 += 1;
            if let Some(score) = record.feedback.get("score").and_then(|s| s.as_f64()) {
                slot.0 += score;
                slot.1 += 1;
            }
        }

        let mut scores = serde_json::Map::new();
        for (category, (sum, scored, attempts)) in sums {
            let average = if scored > 0 {
                json!(sum / f64::from(scored))
            } else {
                serde_json::Value::Null
            };
            scores.insert(
                category.to_string(),
                json!({ "score": average, "attempts": attempts }),
            );
        }

        let map = AbilityMap::new(user_id, serde_json::Value::Object(scores));
        self.coach.upsert_ability_map(&map).await?;
        Ok(map)
    }

    /// Personalized advice from the model, driven by the stored profile and
    /// the freshly recomputed ability map.
    #[tracing::instrument(skip(self))]
    pub async fn advise(
        &self,
        user_id: UserId,
        focus: Option<&str>,
    ) -> Result<serde_json::Value, CoachError> {
        let profile = self
            .coach
            .get_profile(user_id)
            .await?
            .ok_or(CoachError::ProfileNotFound)?;
        let map = self.ability_map(user_id).await?;

        let prompt =
            prompts::coach_advice(&profile.target_role, &profile.goals, &map.scores, focus);
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(CoachError::Completion)?;

        let json = extract_json_object(&reply)?;
        serde_json::from_str(json).map_err(|e| CoachError::Parse(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("coach profile not found")]
    ProfileNotFound,
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
    #[error("unparseable model reply: {0}")]
    Parse(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
