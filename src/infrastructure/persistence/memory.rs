//! In-memory repositories backing the integration tests. They mirror the
//! store's observable semantics: unique email, atomic array appends with no
//! dedup, owner-scoped deletes, newest-first listings.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::{
    CoachRepository, HistoryRepository, InterviewRepository, QuestionFilter, QuestionRepository,
    RepositoryError, StoreHealth, UserRepository,
};
use crate::domain::{
    AbilityMap, CoachProfile, HistoryRecordId, InterviewKind, InterviewReport, InterviewSession,
    LearningRecord, Question, QuestionCategory, QuestionId, SessionId, SessionStatus, User,
    UserId,
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().expect("user store poisoned");
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate email {}",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().expect("user store poisoned");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().expect("user store poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: Option<String>,
        profile: Option<serde_json::Value>,
    ) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().expect("user store poisoned");
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(profile) = profile {
            user.profile = profile;
        }
        Ok(Some(user.clone()))
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut users = self.users.write().expect("user store poisoned");
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

impl MemoryUserRepository {
    /// Test hook: promote an existing user to admin.
    pub fn set_role(&self, id: UserId, role: crate::domain::UserRole) {
        let mut users = self.users.write().expect("user store poisoned");
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
    }

    pub fn count(&self) -> usize {
        self.users.read().expect("user store poisoned").len()
    }
}

#[derive(Default)]
pub struct MemoryQuestionRepository {
    questions: RwLock<HashMap<QuestionCategory, Vec<Question>>>,
}

#[async_trait]
impl QuestionRepository for MemoryQuestionRepository {
    async fn insert_many(&self, questions: &[Question]) -> Result<(), RepositoryError> {
        let mut banks = self.questions.write().expect("question store poisoned");
        for question in questions {
            banks
                .entry(question.category)
                .or_default()
                .push(question.clone());
        }
        Ok(())
    }

    async fn find(
        &self,
        category: QuestionCategory,
        id: QuestionId,
    ) -> Result<Option<Question>, RepositoryError> {
        let banks = self.questions.read().expect("question store poisoned");
        Ok(banks
            .get(&category)
            .and_then(|bank| bank.iter().find(|q| q.id == id))
            .cloned())
    }

    async fn list(
        &self,
        category: QuestionCategory,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, RepositoryError> {
        let banks = self.questions.read().expect("question store poisoned");
        let mut matches: Vec<Question> = banks
            .get(&category)
            .map(|bank| {
                bank.iter()
                    .filter(|q| {
                        filter
                            .difficulty
                            .as_deref()
                            .map(|d| q.difficulty.as_str() == d)
                            .unwrap_or(true)
                    })
                    .filter(|q| {
                        filter
                            .tag
                            .as_deref()
                            .map(|t| q.tags.iter().any(|tag| tag == t))
                            .unwrap_or(true)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            matches.truncate(limit.max(0) as usize);
        }
        Ok(matches)
    }
}

#[derive(Default)]
pub struct MemoryInterviewRepository {
    sessions: RwLock<HashMap<(InterviewKind, SessionId), InterviewSession>>,
}

#[async_trait]
impl InterviewRepository for MemoryInterviewRepository {
    async fn create(&self, session: &InterviewSession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().expect("session store poisoned");
        sessions.insert((session.kind, session.id), session.clone());
        Ok(())
    }

    async fn find(
        &self,
        kind: InterviewKind,
        id: SessionId,
    ) -> Result<Option<InterviewSession>, RepositoryError> {
        let sessions = self.sessions.read().expect("session store poisoned");
        Ok(sessions.get(&(kind, id)).cloned())
    }

    async fn append_submission(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().expect("session store poisoned");
        let session = sessions
            .get_mut(&(kind, id))
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))?;
        session.submissions.push(entry.clone());
        Ok(())
    }

    async fn append_feedback(
        &self,
        kind: InterviewKind,
        id: SessionId,
        entry: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().expect("session store poisoned");
        let session = sessions
            .get_mut(&(kind, id))
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))?;
        session.feedback.push(entry.clone());
        Ok(())
    }

    async fn complete(
        &self,
        kind: InterviewKind,
        id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().expect("session store poisoned");
        let session = sessions
            .get_mut(&(kind, id))
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))?;
        session.status = SessionStatus::Completed;
        session.completed_at = Some(at);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryHistoryRepository {
    learning: RwLock<Vec<LearningRecord>>,
    interviews: RwLock<Vec<InterviewReport>>,
}

#[async_trait]
impl HistoryRepository for MemoryHistoryRepository {
    async fn append_learning(&self, record: &LearningRecord) -> Result<(), RepositoryError> {
        self.learning
            .write()
            .expect("history store poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn list_learning(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LearningRecord>, RepositoryError> {
        let learning = self.learning.read().expect("history store poisoned");
        let mut records: Vec<LearningRecord> = learning
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn delete_learning(
        &self,
        id: HistoryRecordId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut learning = self.learning.write().expect("history store poisoned");
        let before = learning.len();
        learning.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(learning.len() < before)
    }

    async fn append_interview(&self, report: &InterviewReport) -> Result<(), RepositoryError> {
        self.interviews
            .write()
            .expect("history store poisoned")
            .push(report.clone());
        Ok(())
    }

    async fn list_interviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<InterviewReport>, RepositoryError> {
        let interviews = self.interviews.read().expect("history store poisoned");
        let mut reports: Vec<InterviewReport> = interviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }
}

#[derive(Default)]
pub struct MemoryCoachRepository {
    profiles: RwLock<HashMap<UserId, CoachProfile>>,
    ability_maps: RwLock<HashMap<UserId, AbilityMap>>,
}

#[async_trait]
impl CoachRepository for MemoryCoachRepository {
    async fn get_profile(
        &self,
        user_id: UserId,
    ) -> Result<Option<CoachProfile>, RepositoryError> {
        let profiles = self.profiles.read().expect("coach store poisoned");
        Ok(profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &CoachProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().expect("coach store poisoned");
        profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn get_ability_map(
        &self,
        user_id: UserId,
    ) -> Result<Option<AbilityMap>, RepositoryError> {
        let maps = self.ability_maps.read().expect("coach store poisoned");
        Ok(maps.get(&user_id).cloned())
    }

    async fn upsert_ability_map(&self, map: &AbilityMap) -> Result<(), RepositoryError> {
        let mut maps = self.ability_maps.write().expect("coach store poisoned");
        maps.insert(map.user_id, map.clone());
        Ok(())
    }
}

pub struct MemoryStoreHealth;

#[async_trait]
impl StoreHealth for MemoryStoreHealth {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
