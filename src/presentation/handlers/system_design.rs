use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::application::ports::LlmClient;
use crate::domain::{InterviewKind, QuestionId, SessionId, SessionMode};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::session_types::{
    EndSessionResponse, SessionBody, StartSessionResponse, SubmitResponse,
};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SystemDesignStartRequest {
    pub question_id: Option<Uuid>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SystemDesignSubmitRequest {
    pub session_id: Uuid,
    pub design: String,
}

#[derive(Debug, Deserialize)]
pub struct SystemDesignEndRequest {
    pub session_id: Uuid,
}

#[tracing::instrument(skip(state, current, request))]
pub async fn start_system_design_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<SystemDesignStartRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let session = state
        .interview_service
        .start(
            current.id,
            InterviewKind::SystemDesign,
            SessionMode::Practice,
            request.question_id.map(QuestionId::from_uuid),
            request.topic.as_deref(),
            request.difficulty.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse::from(session)),
    ))
}

#[tracing::instrument(skip(state, current, request))]
pub async fn submit_system_design_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<SystemDesignSubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    if request.design.trim().is_empty() {
        return Err(ApiError::bad_request("Design is required"));
    }

    let feedback = state
        .interview_service
        .submit(
            current.id,
            InterviewKind::SystemDesign,
            SessionId::from_uuid(request.session_id),
            json!({ "design": request.design }),
        )
        .await?;

    Ok(Json(SubmitResponse { feedback }))
}

#[tracing::instrument(skip(state, current))]
pub async fn get_system_design_session_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionBody>, ApiError>
where
    L: LlmClient + 'static,
{
    let session = state
        .interview_service
        .session(
            current.id,
            InterviewKind::SystemDesign,
            SessionId::from_uuid(session_id),
        )
        .await?;

    Ok(Json(session.into()))
}

#[tracing::instrument(skip(state, current, request))]
pub async fn end_system_design_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<SystemDesignEndRequest>,
) -> Result<Json<EndSessionResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let report = state
        .interview_service
        .end(
            current.id,
            InterviewKind::SystemDesign,
            SessionId::from_uuid(request.session_id),
        )
        .await?;

    Ok(Json(EndSessionResponse { report }))
}
