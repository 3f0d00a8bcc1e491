mod coach_repository;
mod history_repository;
mod interview_repository;
mod llm_client;
mod question_repository;
mod repository_error;
mod store_health;
mod user_repository;

pub use coach_repository::CoachRepository;
pub use history_repository::HistoryRepository;
pub use interview_repository::InterviewRepository;
pub use llm_client::{LlmClient, LlmClientError};
pub use question_repository::{QuestionFilter, QuestionRepository};
pub use repository_error::RepositoryError;
pub use store_health::StoreHealth;
pub use user_repository::UserRepository;
