use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use prepforge::application::services::{
    AuthService, Claims, CoachService, InterviewService, QuestionService,
};
use prepforge::domain::{
    Difficulty, InterviewKind, Question, QuestionCategory, SessionId, UserId, UserRole,
};
use prepforge::infrastructure::llm::MockLlmClient;
use prepforge::infrastructure::persistence::memory::{
    MemoryCoachRepository, MemoryHistoryRepository, MemoryInterviewRepository,
    MemoryQuestionRepository, MemoryStoreHealth, MemoryUserRepository,
};
use prepforge::presentation::{create_router, AppState};

const TEST_JWT_SECRET: &str = "test-secret";
const TEST_TOKEN_TTL_HOURS: i64 = 24;

const DEFAULT_REPLY: &str = r#"Here it is:
```json
{"questions": [{"title": "Two Sum", "description": "Find two numbers adding to a target.", "difficulty": "easy", "tags": ["arrays"]}]}
```"#;

struct TestApp {
    router: axum::Router,
    users: Arc<MemoryUserRepository>,
    questions: Arc<MemoryQuestionRepository>,
    interviews: Arc<MemoryInterviewRepository>,
    llm: Arc<MockLlmClient>,
}

fn test_app() -> TestApp {
    let users = Arc::new(MemoryUserRepository::default());
    let questions = Arc::new(MemoryQuestionRepository::default());
    let interviews = Arc::new(MemoryInterviewRepository::default());
    let history = Arc::new(MemoryHistoryRepository::default());
    let coach = Arc::new(MemoryCoachRepository::default());
    let llm = Arc::new(MockLlmClient::new(DEFAULT_REPLY));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users) as Arc<dyn prepforge::application::ports::UserRepository>,
        TEST_JWT_SECRET.to_string(),
        TEST_TOKEN_TTL_HOURS,
    ));
    let question_service = Arc::new(QuestionService::new(
        Arc::clone(&llm),
        Arc::clone(&questions) as _,
        Arc::clone(&history) as _,
    ));
    let interview_service = Arc::new(InterviewService::new(
        Arc::clone(&llm),
        Arc::clone(&interviews) as _,
        Arc::clone(&questions) as _,
        Arc::clone(&history) as _,
    ));
    let coach_service = Arc::new(CoachService::new(
        Arc::clone(&llm),
        Arc::clone(&coach) as _,
        Arc::clone(&history) as _,
    ));

    let state = AppState {
        auth_service,
        question_service,
        interview_service,
        coach_service,
        store_health: Arc::new(MemoryStoreHealth),
    };

    TestApp {
        router: create_router(state),
        users,
        questions,
        interviews,
        llm,
    }
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

async fn register(app: &TestApp, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "hunter2!",
            "name": "Test User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap().to_string();
    let uid = body["user"]["uid"].as_str().unwrap().to_string();
    (token, uid)
}

async fn register_admin(app: &TestApp, email: &str) -> String {
    let (_, uid) = register(app, email).await;
    app.users
        .set_role(UserId::parse(&uid).unwrap(), UserRole::Admin);

    // Re-login so the token carries the admin role claim.
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": "hunter2!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn seed_question(app: &TestApp, category: QuestionCategory, difficulty: Difficulty) -> String {
    use prepforge::application::ports::QuestionRepository;

    let question = Question::new(
        "Reverse a list".to_string(),
        "Reverse a singly linked list.".to_string(),
        difficulty,
        category,
        vec!["lists".to_string()],
    );
    let id = question.id.to_string();
    app.questions.insert_many(&[question]).await.unwrap();
    id
}

fn decode_claims(token: &str) -> Claims {
    let key = jsonwebtoken::DecodingKey::from_secret(TEST_JWT_SECRET.as_ref());
    let validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .unwrap()
        .claims
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn given_request_without_id_when_any_endpoint_then_response_carries_request_id() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_request_with_id_when_any_endpoint_then_response_echoes_request_id() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-request-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}

#[tokio::test]
async fn given_new_email_when_register_then_creates_user_and_returns_token() {
    let app = test_app();
    let (token, uid) = register(&app, "alice@example.com").await;

    assert!(!token.is_empty());
    assert!(UserId::parse(&uid).is_ok());
    assert_eq!(app.users.count(), 1);
}

#[tokio::test]
async fn given_used_email_when_register_then_returns_400_and_no_duplicate() {
    let app = test_app();
    register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": "alice@example.com",
            "password": "other-password",
            "name": "Imposter"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already"));
    assert_eq!(app.users.count(), 1);
}

#[tokio::test]
async fn given_blank_name_when_register_then_returns_400() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": "bob@example.com",
            "password": "pw",
            "name": "   "
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.users.count(), 0);
}

#[tokio::test]
async fn given_valid_login_when_login_then_token_role_matches_stored_role() {
    let app = test_app();
    register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": "alice@example.com", "password": "hunter2!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let claims = decode_claims(body["token"].as_str().unwrap());
    assert_eq!(claims.role, UserRole::User);

    let admin_token = register_admin(&app, "root@example.com").await;
    let claims = decode_claims(&admin_token);
    assert_eq!(claims.role, UserRole::Admin);
}

#[tokio::test]
async fn given_wrong_password_when_login_then_returns_401() {
    let app = test_app();
    register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": "alice@example.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_no_token_when_protected_route_then_returns_401() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_garbage_token_when_protected_route_then_returns_401() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/auth/profile", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_valid_token_when_get_profile_then_returns_user() {
    let app = test_app();
    let (token, uid) = register(&app, "alice@example.com").await;

    let (status, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], uid.as_str());
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn given_profile_update_when_put_profile_then_persists_changes() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&token),
        Some(serde_json::json!({
            "name": "Alice Prime",
            "profile": { "preferred_language": "rust" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice Prime");
    assert_eq!(body["profile"]["preferred_language"], "rust");
}

#[tokio::test]
async fn given_unknown_category_when_list_questions_then_returns_400() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/questions/archery", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unmatched_filter_when_list_questions_then_returns_empty_list() {
    let app = test_app();
    seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/questions/coding?difficulty=hard",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn given_matching_filter_when_list_questions_then_returns_questions() {
    let app = test_app();
    seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/questions/coding?difficulty=easy&tag=lists",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 1);
    assert_eq!(body["questions"][0]["title"], "Reverse a list");
}

#[tokio::test]
async fn given_missing_question_when_get_question_then_returns_404() {
    let app = test_app();
    let uri = format!("/api/questions/coding/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_seeded_question_when_get_question_then_returns_it() {
    let app = test_app();
    let id = seed_question(&app, QuestionCategory::SystemDesign, Difficulty::Medium).await;

    let uri = format!("/api/questions/system-design/{}", id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn given_non_admin_token_when_generate_questions_then_returns_403() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/questions/coding/generate",
        Some(&token),
        Some(serde_json::json!({ "topic": "graphs", "difficulty": "medium", "count": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn given_admin_token_when_generate_questions_then_persists_bank_entries() {
    let app = test_app();
    let admin_token = register_admin(&app, "root@example.com").await;

    app.llm.enqueue(
        r#"```json
{"questions": [{"title": "Detect cycle", "description": "Detect a cycle in a directed graph.", "difficulty": "medium", "tags": ["graphs"]}]}
```"#,
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/questions/coding/generate",
        Some(&admin_token),
        Some(serde_json::json!({ "topic": "graphs", "difficulty": "medium", "count": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["title"], "Detect cycle");

    let (_, listed) = send(&app, "GET", "/api/questions/coding", None, None).await;
    assert_eq!(listed["questions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn given_braceless_ai_reply_when_generate_then_returns_500_and_stores_nothing() {
    let app = test_app();
    let admin_token = register_admin(&app, "root@example.com").await;

    app.llm.enqueue("Sorry, I cannot help with that.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/questions/coding/generate",
        Some(&admin_token),
        Some(serde_json::json!({ "topic": "graphs", "difficulty": "medium", "count": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("parse"));

    let (_, listed) = send(&app, "GET", "/api/questions/coding", None, None).await;
    assert_eq!(listed["questions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn given_bad_difficulty_when_generate_then_returns_400() {
    let app = test_app();
    let admin_token = register_admin(&app, "root@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/questions/coding/generate",
        Some(&admin_token),
        Some(serde_json::json!({ "topic": "graphs", "difficulty": "impossible", "count": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_bank_question_when_start_coding_then_session_is_retrievable() {
    use prepforge::application::ports::InterviewRepository;

    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let session_id = SessionId::parse(body["session_id"].as_str().unwrap()).unwrap();
    assert_eq!(body["question"]["title"], "Reverse a list");

    let stored = app
        .interviews
        .find(InterviewKind::Coding, session_id)
        .await
        .unwrap();
    assert!(stored.is_some());

    let uri = format!("/api/code/session/{}", session_id);
    let (status, fetched) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "active");
    assert_eq!(fetched["submissions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn given_empty_bank_when_start_coding_then_question_is_generated() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "topic": "arrays", "difficulty": "easy" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["question"]["title"], "Two Sum");

    // Session questions never leak into the bank.
    let (_, listed) = send(&app, "GET", "/api/questions/coding", None, None).await;
    assert_eq!(listed["questions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn given_two_submissions_when_submit_twice_then_session_has_two_entries() {
    use prepforge::application::ports::InterviewRepository;

    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        app.llm
            .enqueue(r#"{"score": 70, "strengths": [], "weaknesses": [], "feedback": "ok"}"#);
        let (status, body) = send(
            &app,
            "POST",
            "/api/code/submit",
            Some(&token),
            Some(serde_json::json!({
                "session_id": session_id,
                "code": "fn reverse() {}",
                "language": "rust"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"]["score"], 70);
    }

    let stored = app
        .interviews
        .find(
            InterviewKind::Coding,
            SessionId::parse(&session_id).unwrap(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.submissions.len(), 2);
    assert_eq!(stored.feedback.len(), 2);
}

#[tokio::test]
async fn given_unknown_session_when_end_then_returns_404() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/code/end",
        Some(&token),
        Some(serde_json::json!({ "session_id": uuid::Uuid::new_v4() })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_other_users_session_when_submit_then_returns_404() {
    let app = test_app();
    let (owner_token, _) = register(&app, "alice@example.com").await;
    let (other_token, _) = register(&app, "mallory@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&owner_token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/code/submit",
        Some(&other_token),
        Some(serde_json::json!({
            "session_id": session_id,
            "code": "x",
            "language": "rust"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_completed_session_when_end_again_then_returns_400() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/code/end",
        Some(&token),
        Some(serde_json::json!({ "session_id": session_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/code/end",
        Some(&token),
        Some(serde_json::json!({ "session_id": session_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_empty_session_when_end_then_report_is_empty_and_filed() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/end",
        Some(&token),
        Some(serde_json::json!({ "session_id": session_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["submission_count"], 0);
    assert!(body["report"]["summary"].is_null());

    let (_, history) = send(&app, "GET", "/api/mock/history", Some(&token), None).await;
    assert_eq!(history["reports"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn given_submissions_when_end_then_summary_comes_from_model() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    app.llm
        .enqueue(r#"{"score": 90, "strengths": [], "weaknesses": [], "feedback": "nice"}"#);
    send(
        &app,
        "POST",
        "/api/code/submit",
        Some(&token),
        Some(serde_json::json!({
            "session_id": session_id,
            "code": "fn main() {}",
            "language": "rust"
        })),
    )
    .await;

    app.llm.enqueue(
        r#"{"overall_score": 88, "summary": "solid run", "strengths": ["clarity"], "improvement_areas": []}"#,
    );
    let (status, body) = send(
        &app,
        "POST",
        "/api/code/end",
        Some(&token),
        Some(serde_json::json!({ "session_id": session_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["summary"]["overall_score"], 88);
    assert_eq!(body["report"]["submission_count"], 1);
}

#[tokio::test]
async fn given_behavioral_session_when_respond_then_returns_feedback() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Behavioral, Difficulty::Medium).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/behavioral/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    app.llm
        .enqueue(r#"{"score": 75, "strengths": ["honesty"], "weaknesses": [], "feedback": "good"}"#);
    let (status, body) = send(
        &app,
        "POST",
        "/api/behavioral/respond",
        Some(&token),
        Some(serde_json::json!({
            "session_id": session_id,
            "response": "I led the migration and owned the rollback plan."
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["score"], 75);
}

#[tokio::test]
async fn given_system_design_session_when_submit_then_returns_feedback() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id =
        seed_question(&app, QuestionCategory::SystemDesign, Difficulty::Hard).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/system-design/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    app.llm
        .enqueue(r#"{"score": 65, "strengths": [], "weaknesses": ["no sharding"], "feedback": "thin"}"#);
    let (status, body) = send(
        &app,
        "POST",
        "/api/system-design/submit",
        Some(&token),
        Some(serde_json::json!({
            "session_id": session_id,
            "design": "A single Postgres behind a cache."
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["score"], 65);
}

#[tokio::test]
async fn given_failing_model_when_submit_then_returns_500() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Coding, Difficulty::Easy).await;

    let (_, started) = send(
        &app,
        "POST",
        "/api/code/start",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id })),
    )
    .await;
    let session_id = started["session_id"].as_str().unwrap().to_string();

    app.llm.enqueue("no braces at all");
    let (status, body) = send(
        &app,
        "POST",
        "/api/code/submit",
        Some(&token),
        Some(serde_json::json!({
            "session_id": session_id,
            "code": "x",
            "language": "rust"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("parse"));
}

#[tokio::test]
async fn given_llm_question_when_grade_then_records_learning_history() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Llm, Difficulty::Medium).await;

    app.llm.enqueue(
        r#"{"score": 82, "feedback": "mostly right", "correct_points": ["attention"], "missed_points": []}"#,
    );
    let (status, body) = send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&token),
        Some(serde_json::json!({
            "question_id": question_id,
            "answer": "Attention weighs token interactions."
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"]["score"], 82);

    let (status, history) = send(&app, "GET", "/api/questions/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["question_id"], question_id.as_str());
}

#[tokio::test]
async fn given_unknown_question_when_grade_then_returns_404() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&token),
        Some(serde_json::json!({
            "question_id": uuid::Uuid::new_v4(),
            "answer": "anything"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_owned_record_when_delete_history_then_returns_204() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Llm, Difficulty::Medium).await;

    app.llm.enqueue(r#"{"score": 50, "feedback": "meh"}"#);
    send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id, "answer": "short" })),
    )
    .await;

    let (_, history) = send(&app, "GET", "/api/questions/history", Some(&token), None).await;
    let record_id = history["records"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/questions/history/{}", record_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_foreign_record_when_delete_history_then_returns_404_and_record_survives() {
    let app = test_app();
    let (owner_token, _) = register(&app, "alice@example.com").await;
    let (other_token, _) = register(&app, "mallory@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Llm, Difficulty::Medium).await;

    app.llm.enqueue(r#"{"score": 50, "feedback": "meh"}"#);
    send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&owner_token),
        Some(serde_json::json!({ "question_id": question_id, "answer": "short" })),
    )
    .await;

    let (_, history) = send(&app, "GET", "/api/questions/history", Some(&owner_token), None).await;
    let record_id = history["records"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/questions/history/{}", record_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = send(&app, "GET", "/api/questions/history", Some(&owner_token), None).await;
    assert_eq!(history["records"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn given_mock_lifecycle_when_start_answer_end_then_report_is_filed() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, started) = send(
        &app,
        "POST",
        "/api/mock/start",
        Some(&token),
        Some(serde_json::json!({ "kind": "coding", "topic": "arrays", "difficulty": "easy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = started["session_id"].as_str().unwrap().to_string();

    app.llm
        .enqueue(r#"{"score": 60, "strengths": [], "weaknesses": [], "feedback": "rushed"}"#);
    let (status, _) = send(
        &app,
        "POST",
        "/api/mock/answer",
        Some(&token),
        Some(serde_json::json!({
            "kind": "coding",
            "session_id": session_id,
            "answer": "I would sort and scan."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    app.llm.enqueue(
        r#"{"overall_score": 61, "summary": "needs depth", "strengths": [], "improvement_areas": ["detail"]}"#,
    );
    let (status, ended) = send(
        &app,
        "POST",
        "/api/mock/end",
        Some(&token),
        Some(serde_json::json!({ "kind": "coding", "session_id": session_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["report"]["mode"], "mock");

    let (_, history) = send(&app, "GET", "/api/mock/history", Some(&token), None).await;
    assert_eq!(history["reports"].as_array().unwrap().len(), 1);
    assert_eq!(history["reports"][0]["kind"], "coding");
}

#[tokio::test]
async fn given_bad_kind_when_mock_start_then_returns_400() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/mock/start",
        Some(&token),
        Some(serde_json::json!({ "kind": "underwater-basket-weaving" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_no_profile_when_get_coach_profile_then_returns_404() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(&app, "GET", "/api/coach-agent/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_profile_upsert_when_get_coach_profile_then_returns_it() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/coach-agent/profile",
        Some(&token),
        Some(serde_json::json!({
            "target_role": "Staff Engineer",
            "goals": ["pass system design"],
            "preferences": { "pace": "intense" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_role"], "Staff Engineer");

    let (status, body) = send(&app, "GET", "/api/coach-agent/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goals"][0], "pass system design");
}

#[tokio::test]
async fn given_graded_history_when_ability_map_then_scores_by_category() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;
    let question_id = seed_question(&app, QuestionCategory::Llm, Difficulty::Medium).await;

    app.llm.enqueue(r#"{"score": 80, "feedback": "good"}"#);
    send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id, "answer": "a" })),
    )
    .await;
    app.llm.enqueue(r#"{"score": 60, "feedback": "weaker"}"#);
    send(
        &app,
        "POST",
        "/api/llm/grade",
        Some(&token),
        Some(serde_json::json!({ "question_id": question_id, "answer": "b" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/coach-agent/ability-map",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scores"]["llm"]["attempts"], 2);
    assert_eq!(body["scores"]["llm"]["score"], 70.0);
}

#[tokio::test]
async fn given_no_profile_when_advise_then_returns_404() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/coach-agent/advise",
        Some(&token),
        Some(serde_json::json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_profile_when_advise_then_returns_model_advice() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com").await;

    send(
        &app,
        "PUT",
        "/api/coach-agent/profile",
        Some(&token),
        Some(serde_json::json!({
            "target_role": "Backend Engineer",
            "goals": ["improve coding speed"]
        })),
    )
    .await;

    app.llm.enqueue(
        r#"{"advice": "Drill medium problems daily.", "recommendations": [{"category": "coding", "action": "two timed problems per day"}]}"#,
    );
    let (status, body) = send(
        &app,
        "POST",
        "/api/coach-agent/advise",
        Some(&token),
        Some(serde_json::json!({ "focus": "coding" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["advice"]["advice"], "Drill medium problems daily.");
}
