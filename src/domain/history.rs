use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::{InterviewKind, QuestionCategory, QuestionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryRecordId(Uuid);

impl HistoryRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid history record id: {}", e))
    }
}

impl Default for HistoryRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HistoryRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only log entry of one completed practice item and the feedback it
/// received. Deletable individually by the owning user, nothing else.
#[derive(Debug, Clone)]
pub struct LearningRecord {
    pub id: HistoryRecordId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub category: QuestionCategory,
    pub feedback: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LearningRecord {
    pub fn new(
        user_id: UserId,
        question_id: QuestionId,
        category: QuestionCategory,
        feedback: serde_json::Value,
    ) -> Self {
        Self {
            id: HistoryRecordId::new(),
            user_id,
            question_id,
            category,
            feedback,
            created_at: Utc::now(),
        }
    }
}

/// Final report of one finished interview session.
#[derive(Debug, Clone)]
pub struct InterviewReport {
    pub id: HistoryRecordId,
    pub user_id: UserId,
    pub kind: InterviewKind,
    pub report: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl InterviewReport {
    pub fn new(user_id: UserId, kind: InterviewKind, report: serde_json::Value) -> Self {
        Self {
            id: HistoryRecordId::new(),
            user_id,
            kind,
            report,
            created_at: Utc::now(),
        }
    }
}
