use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::application::ports::LlmClient;
use crate::domain::{InterviewKind, InterviewReport, SessionId, SessionMode};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::session_types::{
    EndSessionResponse, StartSessionResponse, SubmitResponse,
};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

fn parse_kind(raw: &str) -> Result<InterviewKind, ApiError> {
    raw.parse::<InterviewKind>().map_err(ApiError::bad_request)
}

#[derive(Debug, Deserialize)]
pub struct MockStartRequest {
    pub kind: String,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MockAnswerRequest {
    pub kind: String,
    pub session_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct MockEndRequest {
    pub kind: String,
    pub session_id: Uuid,
}

/// Mock sessions live in the interview collection matching their kind,
/// tagged `mode: "mock"`; only the final report lands in the user's
/// interview history.
#[tracing::instrument(skip(state, current, request))]
pub async fn start_mock_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<MockStartRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let kind = parse_kind(&request.kind)?;
    let session = state
        .interview_service
        .start(
            current.id,
            kind,
            SessionMode::Mock,
            None,
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
pub async fn answer_mock_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<MockAnswerRequest>,
) -> Result<Json<SubmitResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let kind = parse_kind(&request.kind)?;
    if request.answer.trim().is_empty() {
        return Err(ApiError::bad_request("Answer is required"));
    }

    let feedback = state
        .interview_service
        .submit(
            current.id,
            kind,
            SessionId::from_uuid(request.session_id),
            json!({ "answer": request.answer }),
        )
        .await?;

    Ok(Json(SubmitResponse { feedback }))
}

#[tracing::instrument(skip(state, current, request))]
pub async fn end_mock_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<MockEndRequest>,
) -> Result<Json<EndSessionResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let kind = parse_kind(&request.kind)?;
    let report = state
        .interview_service
        .end(current.id, kind, SessionId::from_uuid(request.session_id))
        .await?;

    Ok(Json(EndSessionResponse { report }))
}

#[derive(Serialize)]
pub struct InterviewReportBody {
    pub id: String,
    pub kind: InterviewKind,
    pub report: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<InterviewReport> for InterviewReportBody {
    fn from(r: InterviewReport) -> Self {
        Self {
            id: r.id.to_string(),
            kind: r.kind,
            report: r.report,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct InterviewHistoryResponse {
    pub reports: Vec<InterviewReportBody>,
}

#[tracing::instrument(skip(state, current))]
pub async fn interview_history_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<InterviewHistoryResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let reports = state.interview_service.list_reports(current.id).await?;
    Ok(Json(InterviewHistoryResponse {
        reports: reports.into_iter().map(Into::into).collect(),
    }))
}
