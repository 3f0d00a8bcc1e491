use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::application::ports::{
    HistoryRepository, InterviewRepository, LlmClient, LlmClientError, QuestionFilter,
    QuestionRepository, RepositoryError,
};
use crate::application::services::prompts;
use crate::application::services::response_parser::{extract_json_object, MalformedResponse};
use crate::domain::{
    InterviewKind, InterviewReport, InterviewSession, Question, QuestionCategory, QuestionId,
    SessionId, SessionMode, SessionStatus, UserId,
};

fn category_for(kind: InterviewKind) -> QuestionCategory {
    match kind {
        InterviewKind::Coding => QuestionCategory::Coding,
        InterviewKind::Behavioral => QuestionCategory::Behavioral,
        InterviewKind::SystemDesign => QuestionCategory::SystemDesign,
    }
}

fn question_to_value(q: &Question) -> serde_json::Value {
    json!({
        "id": q.id.to_string(),
        "title": q.title,
        "description": q.description,
        "difficulty": q.difficulty,
        "category": q.category,
        "tags": q.tags,
    })
}

pub struct InterviewService<L>
where
    L: LlmClient,
{
    llm: Arc<L>,
    interviews: Arc<dyn InterviewRepository>,
    questions: Arc<dyn QuestionRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl<L> InterviewService<L>
where
    L: LlmClient,
{
    pub fn new(
        llm: Arc<L>,
        interviews: Arc<dyn InterviewRepository>,
        questions: Arc<dyn QuestionRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            llm,
            interviews,
            questions,
            history,
        }
    }

    /// Starts a session against a bank question when one is available,
    /// otherwise generates a one-off question. Generated questions live only
    /// inside the session document; the bank is mutated by admin routes alone.
    #[tracing::instrument(skip(self))]
    pub async fn start(
        &self,
        user_id: UserId,
        kind: InterviewKind,
        mode: SessionMode,
        question_id: Option<QuestionId>,
        topic: Option<&str>,
        difficulty: Option<&str>,
    ) -> Result<InterviewSession, InterviewError> {
        let category = category_for(kind);

        let question_data = match question_id {
            Some(id) => {
                let question = self
                    .questions
                    .find(category, id)
                    .await?
                    .ok_or(InterviewError::QuestionNotFound)?;
                question_to_value(&question)
            }
            None => {
                let filter = QuestionFilter {
                    difficulty: difficulty.map(String::from),
                    tag: topic.map(String::from),
                    limit: Some(1),
                };
                match self.questions.list(category, &filter).await?.into_iter().next() {
                    Some(question) => question_to_value(&question),
                    None => {
                        self.generate_session_question(category, topic, difficulty)
                            .await?
                    }
                }
            }
        };

        let session = InterviewSession::new(user_id, kind, mode, question_data);
        self.interviews.create(&session).await?;
        tracing::info!(session_id = %session.id, kind = %kind, "Interview session started");
        Ok(session)
    }

    async fn generate_session_question(
        &self,
        category: QuestionCategory,
        topic: Option<&str>,
        difficulty: Option<&str>,
    ) -> Result<serde_json::Value, InterviewError> {
        let prompt = prompts::generate_questions(
            category,
            topic.unwrap_or("general"),
            difficulty.unwrap_or("medium"),
            1,
        );
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(InterviewError::Completion)?;
        let json = extract_json_object(&reply)?;
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| InterviewError::Parse(e.to_string()))?;

        parsed
            .get("questions")
            .and_then(|qs| qs.as_array())
            .and_then(|qs| qs.first())
            .cloned()
            .ok_or_else(|| InterviewError::Parse("model reply had no questions".to_string()))
    }

    /// Appends one submission and its model feedback. Appends are plain
    /// array-pushes with no dedup; submitting twice yields two entries.
    #[tracing::instrument(skip(self, content))]
    pub async fn submit(
        &self,
        user_id: UserId,
        kind: InterviewKind,
        session_id: SessionId,
        content: serde_json::Value,
    ) -> Result<serde_json::Value, InterviewError> {
        let session = self.load_owned(kind, session_id, user_id).await?;
        if session.status == SessionStatus::Completed {
            return Err(InterviewError::AlreadyCompleted);
        }

        let mut entry = content;
        if let Some(obj) = entry.as_object_mut() {
            obj.insert("submitted_at".to_string(), json!(Utc::now()));
        }
        self.interviews
            .append_submission(kind, session_id, &entry)
            .await?;

        let prompt = prompts::grade_submission(kind, &session.question_data, &entry);
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(InterviewError::Completion)?;
        let json = extract_json_object(&reply)?;
        let feedback: serde_json::Value =
            serde_json::from_str(json).map_err(|e| InterviewError::Parse(e.to_string()))?;

        self.interviews
            .append_feedback(kind, session_id, &feedback)
            .await?;

        Ok(feedback)
    }

    /// Finalizes a session exactly once and files the report under the
    /// user's interview history. A session with nothing submitted produces
    /// an empty report without a model call.
    #[tracing::instrument(skip(self))]
    pub async fn end(
        &self,
        user_id: UserId,
        kind: InterviewKind,
        session_id: SessionId,
    ) -> Result<serde_json::Value, InterviewError> {
        let session = self.load_owned(kind, session_id, user_id).await?;
        if session.status == SessionStatus::Completed {
            return Err(InterviewError::AlreadyCompleted);
        }

        let completed_at = Utc::now();
        self.interviews
            .complete(kind, session_id, completed_at)
            .await?;

        let summary = if session.submissions.is_empty() && session.feedback.is_empty() {
            serde_json::Value::Null
        } else {
            let prompt = prompts::session_summary(
                kind,
                &session.question_data,
                &session.submissions,
                &session.feedback,
            );
            let reply = self
                .llm
                .generate(&prompt)
                .await
                .map_err(InterviewError::Completion)?;
            let json = extract_json_object(&reply)?;
            serde_json::from_str(json).map_err(|e| InterviewError::Parse(e.to_string()))?
        };

        let report = json!({
            "session_id": session_id.to_string(),
            "kind": kind,
            "mode": session.mode,
            "question": session.question_data,
            "submission_count": session.submissions.len(),
            "submissions": session.submissions,
            "feedback": session.feedback,
            "summary": summary,
            "completed_at": completed_at,
        });

        self.history
            .append_interview(&InterviewReport::new(user_id, kind, report.clone()))
            .await?;

        tracing::info!(session_id = %session_id, kind = %kind, "Interview session completed");
        Ok(report)
    }

    pub async fn session(
        &self,
        user_id: UserId,
        kind: InterviewKind,
        session_id: SessionId,
    ) -> Result<InterviewSession, InterviewError> {
        self.load_owned(kind, session_id, user_id).await
    }

    pub async fn list_reports(
        &self,
        user_id: UserId,
    ) -> Result<Vec<InterviewReport>, InterviewError> {
        Ok(self.history.list_interviews(user_id).await?)
    }

    /// A session owned by someone else is indistinguishable from a missing
    /// one.
    async fn load_owned(
        &self,
        kind: InterviewKind,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<InterviewSession, InterviewError> {
        let session = self
            .interviews
            .find(kind, session_id)
            .await?
            .ok_or(InterviewError::NotFound)?;
        if session.user_id != user_id {
            return Err(InterviewError::NotFound);
        }
        Ok(session)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error("session not found")]
    NotFound,
    #[error("question not found")]
    QuestionNotFound,
    #[error("session already completed")]
    AlreadyCompleted,
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
    #[error("unparseable model reply: {0}")]
    Parse(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
