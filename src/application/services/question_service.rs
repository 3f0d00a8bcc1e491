use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{
    HistoryRepository, LlmClient, LlmClientError, QuestionFilter, QuestionRepository,
    RepositoryError,
};
use crate::application::services::response_parser::{extract_json_object, MalformedResponse};
use crate::application::services::prompts;
use crate::domain::{
    Difficulty, HistoryRecordId, LearningRecord, Question, QuestionCategory, QuestionId, UserId,
};

/// Shape the generation prompt asks the model for. Anything that does not
/// parse into this is a terminal failure for the request; there is no repair.
#[derive(Debug, Deserialize)]
struct GeneratedQuestionSet {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    title: String,
    description: String,
    difficulty: Difficulty,
    #[serde(default)]
    tags: Vec<String>,
}

pub struct QuestionService<L>
where
    L: LlmClient,
{
    llm: Arc<L>,
    questions: Arc<dyn QuestionRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl<L> QuestionService<L>
where
    L: LlmClient,
{
    pub fn new(
        llm: Arc<L>,
        questions: Arc<dyn QuestionRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            llm,
            questions,
            history,
        }
    }

    pub async fn list(
        &self,
        category: QuestionCategory,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, QuestionServiceError> {
        Ok(self.questions.list(category, filter).await?)
    }

    pub async fn get(
        &self,
        category: QuestionCategory,
        id: QuestionId,
    ) -> Result<Question, QuestionServiceError> {
        self.questions
            .find(category, id)
            .await?
            .ok_or(QuestionServiceError::NotFound)
    }

    /// Admin flow: prompt the model, cut the JSON object out of the reply,
    /// persist the questions verbatim.
    #[tracing::instrument(skip(self))]
    pub async fn generate(
        &self,
        category: QuestionCategory,
        topic: &str,
        difficulty: &str,
        count: usize,
    ) -> Result<Vec<Question>, QuestionServiceError> {
        let prompt = prompts::generate_questions(category, topic, difficulty, count);
        tracing::debug!(prompt_chars = prompt.len(), "Requesting question generation");

        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(QuestionServiceError::Completion)?;

        let json = extract_json_object(&reply)?;
        let set: GeneratedQuestionSet =
            serde_json::from_str(json).map_err(|e| QuestionServiceError::Parse(e.to_string()))?;

        let questions: Vec<Question> = set
            .questions
            .into_iter()
            .take(count)
            .map(|g| Question::new(g.title, g.description, g.difficulty, category, g.tags))
            .collect();

        self.questions.insert_many(&questions).await?;
        tracing::info!(category = %category, stored = questions.len(), "Generated questions stored");
        Ok(questions)
    }

    /// Grades a written answer against an LLM-topics bank question and
    /// appends the result to the caller's learning history.
    #[tracing::instrument(skip(self, answer))]
    pub async fn grade(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        answer: &str,
    ) -> Result<serde_json::Value, QuestionServiceError> {
        let question = self
            .questions
            .find(QuestionCategory::Llm, question_id)
            .await?
            .ok_or(QuestionServiceError::NotFound)?;

        let prompt = prompts::grade_answer(&question.title, &question.description, answer);
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(QuestionServiceError::Completion)?;

        let json = extract_json_object(&reply)?;
        let grade: serde_json::Value =
            serde_json::from_str(json).map_err(|e| QuestionServiceError::Parse(e.to_string()))?;

        let record = LearningRecord::new(
            user_id,
            question.id,
            QuestionCategory::Llm,
            grade.clone(),
        );
        self.history.append_learning(&record).await?;

        Ok(grade)
    }

    pub async fn learning_history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LearningRecord>, QuestionServiceError> {
        Ok(self.history.list_learning(user_id).await?)
    }

    /// Returns `false` when the record is absent or owned by someone else.
    pub async fn delete_history(
        &self,
        user_id: UserId,
        id: HistoryRecordId,
    ) -> Result<bool, QuestionServiceError> {
        Ok(self.history.delete_learning(id, user_id).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionServiceError {
    #[error("question not found")]
    NotFound,
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
    #[error("unparseable model reply: {0}")]
    Parse(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
