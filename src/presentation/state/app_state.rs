use std::sync::Arc;

use crate::application::ports::{LlmClient, StoreHealth};
use crate::application::services::{AuthService, CoachService, InterviewService, QuestionService};

pub struct AppState<L>
where
    L: LlmClient,
{
    pub auth_service: Arc<AuthService>,
    pub question_service: Arc<QuestionService<L>>,
    pub interview_service: Arc<InterviewService<L>>,
    pub coach_service: Arc<CoachService<L>>,
    pub store_health: Arc<dyn StoreHealth>,
}

impl<L> Clone for AppState<L>
where
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            question_service: Arc::clone(&self.question_service),
            interview_service: Arc::clone(&self.interview_service),
            coach_service: Arc::clone(&self.coach_service),
            store_health: Arc::clone(&self.store_health),
        }
    }
}
