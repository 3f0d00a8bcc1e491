use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId(Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four question banks served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionCategory {
    #[serde(rename = "coding")]
    Coding,
    #[serde(rename = "system-design")]
    SystemDesign,
    #[serde(rename = "behavioral")]
    Behavioral,
    #[serde(rename = "llm")]
    Llm,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Coding => "coding",
            QuestionCategory::SystemDesign => "system-design",
            QuestionCategory::Behavioral => "behavioral",
            QuestionCategory::Llm => "llm",
        }
    }

    /// Backing table for the bank, named after the original collection.
    pub fn table(&self) -> &'static str {
        match self {
            QuestionCategory::Coding => "coding_questions",
            QuestionCategory::SystemDesign => "system_design_questions",
            QuestionCategory::Behavioral => "behavioral_questions",
            QuestionCategory::Llm => "llm_questions",
        }
    }
}

impl FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coding" => Ok(QuestionCategory::Coding),
            "system-design" => Ok(QuestionCategory::SystemDesign),
            "behavioral" => Ok(QuestionCategory::Behavioral),
            "llm" => Ok(QuestionCategory::Llm),
            _ => Err(format!("Invalid question category: {}", s)),
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank question. Persisted verbatim after generation; read-only afterward
/// except for admin overwrite.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: QuestionCategory,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        title: String,
        description: String,
        difficulty: Difficulty,
        category: QuestionCategory,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            title,
            description,
            difficulty,
            category,
            tags,
            created_at: Utc::now(),
        }
    }
}
