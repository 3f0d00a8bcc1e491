use chrono::{DateTime, Utc};

use super::UserId;

/// Per-user coaching preferences, written by the user through the coach-agent
/// endpoints. `preferences` stays a free-form document.
#[derive(Debug, Clone)]
pub struct CoachProfile {
    pub user_id: UserId,
    pub target_role: String,
    pub goals: Vec<String>,
    pub preferences: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl CoachProfile {
    pub fn new(
        user_id: UserId,
        target_role: String,
        goals: Vec<String>,
        preferences: serde_json::Value,
    ) -> Self {
        Self {
            user_id,
            target_role,
            goals,
            preferences,
            updated_at: Utc::now(),
        }
    }
}

/// Per-category strength scores derived from the user's learning history.
/// Recomputed on read and cached in its own table.
#[derive(Debug, Clone)]
pub struct AbilityMap {
    pub user_id: UserId,
    pub scores: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl AbilityMap {
    pub fn new(user_id: UserId, scores: serde_json::Value) -> Self {
        Self {
            user_id,
            scores,
            updated_at: Utc::now(),
        }
    }
}
