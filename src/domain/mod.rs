mod coach;
mod history;
mod interview;
mod question;
mod user;

pub use coach::{AbilityMap, CoachProfile};
pub use history::{HistoryRecordId, InterviewReport, LearningRecord};
pub use interview::{InterviewKind, InterviewSession, SessionId, SessionMode, SessionStatus};
pub use question::{Difficulty, Question, QuestionCategory, QuestionId};
pub use user::{User, UserId, UserRole};
