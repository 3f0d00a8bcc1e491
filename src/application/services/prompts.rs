//! Prompt templates sent to the generative-AI endpoint. Every template asks
//! for a single JSON object so the reply survives `extract_json_object`.

use crate::domain::{InterviewKind, QuestionCategory};

pub fn generate_questions(
    category: QuestionCategory,
    topic: &str,
    difficulty: &str,
    count: usize,
) -> String {
    let kind_line = match category {
        QuestionCategory::Coding => "coding interview questions with concrete input/output expectations",
        QuestionCategory::SystemDesign => "system design interview questions describing a system to design and its constraints",
        QuestionCategory::Behavioral => "behavioral interview questions probing past experience",
        QuestionCategory::Llm => "interview questions about large language models and applied ML engineering",
    };

    format!(
        r#"You are an interview content author. Write {count} {kind_line}.
Topic: {topic}
Difficulty: {difficulty} (one of: easy, medium, hard)

Reply with ONLY a JSON object in this exact shape:
{{
  "questions": [
    {{
      "title": "short title",
      "description": "full question text",
      "difficulty": "{difficulty}",
      "tags": ["tag1", "tag2"]
    }}
  ]
}}"#
    )
}

pub fn grade_submission(
    kind: InterviewKind,
    question_data: &serde_json::Value,
    submission: &serde_json::Value,
) -> String {
    let role_line = match kind {
        InterviewKind::Coding => "You are a senior engineer reviewing a candidate's code.",
        InterviewKind::Behavioral => "You are an experienced interviewer assessing a behavioral answer.",
        InterviewKind::SystemDesign => "You are a principal engineer reviewing a system design proposal.",
    };

    format!(
        r#"{role_line}

Question:
{question}

Candidate {label}:
{submission}

Reply with ONLY a JSON object:
{{
  "score": <0-100>,
  "strengths": ["..."],
  "weaknesses": ["..."],
  "feedback": "concise overall feedback"
}}"#,
        question = question_data,
        label = kind.submission_label(),
        submission = submission,
    )
}

pub fn session_summary(
    kind: InterviewKind,
    question_data: &serde_json::Value,
    submissions: &[serde_json::Value],
    feedback: &[serde_json::Value],
) -> String {
    format!(
        r#"You are summarizing a completed {kind} practice interview.

Question:
{question}

All candidate submissions, in order:
{submissions}

Per-submission feedback already given:
{feedback}

Reply with ONLY a JSON object:
{{
  "overall_score": <0-100>,
  "summary": "overall assessment",
  "strengths": ["..."],
  "improvement_areas": ["..."]
}}"#,
        kind = kind.as_str(),
        question = question_data,
        submissions = serde_json::Value::Array(submissions.to_vec()),
        feedback = serde_json::Value::Array(feedback.to_vec()),
    )
}

pub fn grade_answer(question_title: &str, question_description: &str, answer: &str) -> String {
    format!(
        r#"You are grading a short written answer to an interview question about LLMs.

Question: {question_title}
{question_description}

Candidate answer:
{answer}

Reply with ONLY a JSON object:
{{
  "score": <0-100>,
  "feedback": "what was right and what was missing",
  "correct_points": ["..."],
  "missed_points": ["..."]
}}"#
    )
}

pub fn coach_advice(
    target_role: &str,
    goals: &[String],
    ability_scores: &serde_json::Value,
    focus: Option<&str>,
) -> String {
    let focus_line = match focus {
        Some(f) => format!("The user asked to focus on: {f}"),
        None => String::from("No specific focus was requested."),
    };

    format!(
        r#"You are an interview preparation coach.

The user targets the role: {target_role}
Their stated goals: {goals}
Their per-category ability scores derived from practice history:
{ability_scores}

{focus_line}

Reply with ONLY a JSON object:
{{
  "advice": "one paragraph of tailored advice",
  "recommendations": [
    {{"category": "coding|system-design|behavioral|llm", "action": "concrete next step"}}
  ]
}}"#,
        goals = goals.join(", "),
    )
}
