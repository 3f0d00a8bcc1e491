use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{LlmClient, QuestionFilter};
use crate::domain::{
    Difficulty, HistoryRecordId, LearningRecord, Question, QuestionCategory, QuestionId,
};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

const MAX_GENERATION_COUNT: usize = 20;

fn parse_category(raw: &str) -> Result<QuestionCategory, ApiError> {
    raw.parse::<QuestionCategory>().map_err(ApiError::bad_request)
}

#[derive(Debug, Deserialize)]
pub struct QuestionListQuery {
    pub difficulty: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct QuestionBody {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: QuestionCategory,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionBody {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.to_string(),
            title: q.title,
            description: q.description,
            difficulty: q.difficulty,
            category: q.category,
            tags: q.tags,
            created_at: q.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionBody>,
}

#[tracing::instrument(skip(state))]
pub async fn list_questions_handler<L>(
    State(state): State<AppState<L>>,
    Path(category): Path<String>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<QuestionListResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let category = parse_category(&category)?;
    let filter = QuestionFilter {
        difficulty: query.difficulty,
        tag: query.tag,
        limit: query.limit,
    };

    let questions = state.question_service.list(category, &filter).await?;
    Ok(Json(QuestionListResponse {
        questions: questions.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip(state))]
pub async fn get_question_handler<L>(
    State(state): State<AppState<L>>,
    Path((category, id)): Path<(String, Uuid)>,
) -> Result<Json<QuestionBody>, ApiError>
where
    L: LlmClient + 'static,
{
    let category = parse_category(&category)?;
    let question = state
        .question_service
        .get(category, QuestionId::from_uuid(id))
        .await?;

    Ok(Json(question.into()))
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub topic: String,
    pub difficulty: String,
    pub count: Option<usize>,
}

#[tracing::instrument(skip(state, request))]
pub async fn generate_questions_handler<L>(
    State(state): State<AppState<L>>,
    Path(category): Path<String>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<QuestionListResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let category = parse_category(&category)?;
    generate_into_bank(&state, category, request).await
}

/// Shared by `/api/questions/{category}/generate` and `/api/llm/generate`.
pub(super) async fn generate_into_bank<L>(
    state: &AppState<L>,
    category: QuestionCategory,
    request: GenerateQuestionsRequest,
) -> Result<Json<QuestionListResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    if request.topic.trim().is_empty() {
        return Err(ApiError::bad_request("Topic is required"));
    }
    request
        .difficulty
        .parse::<Difficulty>()
        .map_err(ApiError::bad_request)?;
    let count = request.count.unwrap_or(1);
    if count == 0 || count > MAX_GENERATION_COUNT {
        return Err(ApiError::bad_request(format!(
            "count must be between 1 and {}",
            MAX_GENERATION_COUNT
        )));
    }

    let questions = state
        .question_service
        .generate(category, request.topic.trim(), &request.difficulty, count)
        .await?;

    Ok(Json(QuestionListResponse {
        questions: questions.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Serialize)]
pub struct LearningRecordBody {
    pub id: String,
    pub question_id: String,
    pub category: QuestionCategory,
    pub feedback: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<LearningRecord> for LearningRecordBody {
    fn from(r: LearningRecord) -> Self {
        Self {
            id: r.id.to_string(),
            question_id: r.question_id.to_string(),
            category: r.category,
            feedback: r.feedback,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct LearningHistoryResponse {
    pub records: Vec<LearningRecordBody>,
}

#[tracing::instrument(skip(state, current))]
pub async fn list_history_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<LearningHistoryResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let records = state.question_service.learning_history(current.id).await?;
    Ok(Json(LearningHistoryResponse {
        records: records.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip(state, current))]
pub async fn delete_history_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let deleted = state
        .question_service
        .delete_history(current.id, HistoryRecordId::from_uuid(id))
        .await?;

    if !deleted {
        return Err(ApiError::not_found("History record not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
