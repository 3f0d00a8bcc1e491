//! Wire shapes shared by the per-kind interview route groups.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{InterviewKind, InterviewSession, SessionMode, SessionStatus};

#[derive(Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub question: serde_json::Value,
}

impl From<InterviewSession> for StartSessionResponse {
    fn from(session: InterviewSession) -> Self {
        Self {
            session_id: session.id.to_string(),
            question: session.question_data,
        }
    }
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub feedback: serde_json::Value,
}

#[derive(Serialize)]
pub struct EndSessionResponse {
    pub report: serde_json::Value,
}

#[derive(Serialize)]
pub struct SessionBody {
    pub session_id: String,
    pub kind: InterviewKind,
    pub mode: SessionMode,
    pub status: SessionStatus,
    pub question: serde_json::Value,
    pub submissions: Vec<serde_json::Value>,
    pub feedback: Vec<serde_json::Value>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<InterviewSession> for SessionBody {
    fn from(session: InterviewSession) -> Self {
        Self {
            session_id: session.id.to_string(),
            kind: session.kind,
            mode: session.mode,
            status: session.status,
            question: session.question_data,
            submissions: session.submissions,
            feedback: session.feedback,
            started_at: session.started_at,
            completed_at: session.completed_at,
        }
    }
}
