use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{LlmClient, QuestionFilter};
use crate::domain::{QuestionCategory, QuestionId};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::questions::{
    generate_into_bank, GenerateQuestionsRequest, QuestionListQuery, QuestionListResponse,
};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn list_llm_questions_handler<L>(
    State(state): State<AppState<L>>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<QuestionListResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let filter = QuestionFilter {
        difficulty: query.difficulty,
        tag: query.tag,
        limit: query.limit,
    };

    let questions = state
        .question_service
        .list(QuestionCategory::Llm, &filter)
        .await?;

    Ok(Json(QuestionListResponse {
        questions: questions.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip(state, request))]
pub async fn generate_llm_questions_handler<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<QuestionListResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    generate_into_bank(&state, QuestionCategory::Llm, request).await
}

#[derive(Debug, Deserialize)]
pub struct GradeAnswerRequest {
    pub question_id: Uuid,
    pub answer: String,
}

#[derive(Serialize)]
pub struct GradeAnswerResponse {
    pub grade: serde_json::Value,
}

/// Grades a written answer against an LLM-topics bank question and files the
/// result under the caller's learning history.
#[tracing::instrument(skip(state, current, request))]
pub async fn grade_answer_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<GradeAnswerRequest>,
) -> Result<Json<GradeAnswerResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    if request.answer.trim().is_empty() {
        return Err(ApiError::bad_request("Answer is required"));
    }
    tracing::debug!(answer = %sanitize_prompt(&request.answer), "Grading answer");

    let grade = state
        .question_service
        .grade(
            current.id,
            QuestionId::from_uuid(request.question_id),
            &request.answer,
        )
        .await?;

    Ok(Json(GradeAnswerResponse { grade }))
}
