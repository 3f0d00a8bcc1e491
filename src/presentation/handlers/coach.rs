use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::domain::{AbilityMap, CoachProfile};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CoachProfileBody {
    pub user_id: String,
    pub target_role: String,
    pub goals: Vec<String>,
    pub preferences: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<CoachProfile> for CoachProfileBody {
    fn from(p: CoachProfile) -> Self {
        Self {
            user_id: p.user_id.to_string(),
            target_role: p.target_role,
            goals: p.goals,
            preferences: p.preferences,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct AbilityMapBody {
    pub user_id: String,
    pub scores: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<AbilityMap> for AbilityMapBody {
    fn from(m: AbilityMap) -> Self {
        Self {
            user_id: m.user_id.to_string(),
            scores: m.scores,
            updated_at: m.updated_at,
        }
    }
}

#[tracing::instrument(skip(state, current))]
pub async fn get_coach_profile_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<CoachProfileBody>, ApiError>
where
    L: LlmClient + 'static,
{
    let profile = state
        .coach_service
        .profile(current.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Coach profile not found"))?;

    Ok(Json(profile.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpsertCoachProfileRequest {
    pub target_role: String,
    pub goals: Vec<String>,
    pub preferences: Option<serde_json::Value>,
}

#[tracing::instrument(skip(state, current, request))]
pub async fn put_coach_profile_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpsertCoachProfileRequest>,
) -> Result<Json<CoachProfileBody>, ApiError>
where
    L: LlmClient + 'static,
{
    if request.target_role.trim().is_empty() {
        return Err(ApiError::bad_request("Target role is required"));
    }

    let profile = state
        .coach_service
        .upsert_profile(
            current.id,
            request.target_role.trim().to_string(),
            request.goals,
            request.preferences,
        )
        .await?;

    Ok(Json(profile.into()))
}

#[tracing::instrument(skip(state, current))]
pub async fn ability_map_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<AbilityMapBody>, ApiError>
where
    L: LlmClient + 'static,
{
    let map = state.coach_service.ability_map(current.id).await?;
    Ok(Json(map.into()))
}

#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    pub focus: Option<String>,
}

#[derive(Serialize)]
pub struct AdviseResponse {
    pub advice: serde_json::Value,
}

#[tracing::instrument(skip(state, current, request))]
pub async fn advise_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<AdviseRequest>,
) -> Result<Json<AdviseResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let advice = state
        .coach_service
        .advise(current.id, request.focus.as_deref())
        .await?;

    Ok(Json(AdviseResponse { advice }))
}
