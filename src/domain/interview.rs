use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
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
            .map_err(|e| format!("Invalid session id: {}", e))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three per-kind interview collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewKind {
    #[serde(rename = "coding")]
    Coding,
    #[serde(rename = "behavioral")]
    Behavioral,
    #[serde(rename = "system-design")]
    SystemDesign,
}

impl InterviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewKind::Coding => "coding",
            InterviewKind::Behavioral => "behavioral",
            InterviewKind::SystemDesign => "system-design",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            InterviewKind::Coding => "coding_interviews",
            InterviewKind::Behavioral => "behavioral_interviews",
            InterviewKind::SystemDesign => "system_design_interviews",
        }
    }

    /// What a submitted piece of work is called for this kind. Used both in
    /// stored submission entries and in feedback prompts.
    pub fn submission_label(&self) -> &'static str {
        match self {
            InterviewKind::Coding => "solution",
            InterviewKind::Behavioral => "response",
            InterviewKind::SystemDesign => "design",
        }
    }
}

impl FromStr for InterviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coding" => Ok(InterviewKind::Coding),
            "behavioral" => Ok(InterviewKind::Behavioral),
            "system-design" => Ok(InterviewKind::SystemDesign),
            _ => Err(format!("Invalid interview kind: {}", s)),
        }
    }
}

impl fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            _ => Err(format!("Invalid session status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Practice,
    Mock,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Practice => "practice",
            SessionMode::Mock => "mock",
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practice" => Ok(SessionMode::Practice),
            "mock" => Ok(SessionMode::Mock),
            _ => Err(format!("Invalid session mode: {}", s)),
        }
    }
}

/// One practice-interview attempt. `question_data`, `submissions`, and
/// `feedback` stay schemaless documents: their shapes vary by kind and by
/// what the model returned.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub kind: InterviewKind,
    pub mode: SessionMode,
    pub question_data: serde_json::Value,
    pub status: SessionStatus,
    pub submissions: Vec<serde_json::Value>,
    pub feedback: Vec<serde_json::Value>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    pub fn new(
        user_id: UserId,
        kind: InterviewKind,
        mode: SessionMode,
        question_data: serde_json::Value,
    ) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            kind,
            mode,
            question_data,
            status: SessionStatus::Active,
            submissions: Vec::new(),
            feedback: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }
}
