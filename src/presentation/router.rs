use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::LlmClient;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    ability_map_handler, advise_handler, answer_mock_handler, delete_history_handler,
    end_behavioral_handler, end_coding_handler, end_mock_handler, end_system_design_handler,
    generate_llm_questions_handler, generate_questions_handler, get_behavioral_session_handler,
    get_coach_profile_handler, get_coding_session_handler, get_profile_handler,
    get_question_handler, get_system_design_session_handler, grade_answer_handler, health_handler,
    interview_history_handler, list_history_handler, list_llm_questions_handler,
    list_questions_handler, login_handler, put_coach_profile_handler, register_handler,
    respond_behavioral_handler, start_behavioral_handler, start_coding_handler,
    start_mock_handler, start_system_design_handler, submit_coding_handler,
    submit_system_design_handler, update_profile_handler,
};
use crate::presentation::middleware::{auth_middleware, require_admin};
use crate::presentation::state::AppState;

pub fn create_router<L>(state: AppState<L>) -> Router
where
    L: LlmClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let auth = Arc::clone(&state.auth_service);

    let public = Router::new()
        .route("/health", get(health_handler::<L>))
        .route("/api/auth/register", post(register_handler::<L>))
        .route("/api/auth/login", post(login_handler::<L>))
        .route("/api/questions/{category}", get(list_questions_handler::<L>))
        .route(
            "/api/questions/{category}/{id}",
            get(get_question_handler::<L>),
        )
        .route("/api/llm/questions", get(list_llm_questions_handler::<L>));

    let protected = Router::new()
        .route(
            "/api/auth/profile",
            get(get_profile_handler::<L>).put(update_profile_handler::<L>),
        )
        .route("/api/questions/history", get(list_history_handler::<L>))
        .route(
            "/api/questions/history/{id}",
            delete(delete_history_handler::<L>),
        )
        .route("/api/code/start", post(start_coding_handler::<L>))
        .route("/api/code/submit", post(submit_coding_handler::<L>))
        .route("/api/code/end", post(end_coding_handler::<L>))
        .route(
            "/api/code/session/{id}",
            get(get_coding_session_handler::<L>),
        )
        .route("/api/behavioral/start", post(start_behavioral_handler::<L>))
        .route(
            "/api/behavioral/respond",
            post(respond_behavioral_handler::<L>),
        )
        .route("/api/behavioral/end", post(end_behavioral_handler::<L>))
        .route(
            "/api/behavioral/session/{id}",
            get(get_behavioral_session_handler::<L>),
        )
        .route(
            "/api/system-design/start",
            post(start_system_design_handler::<L>),
        )
        .route(
            "/api/system-design/submit",
            post(submit_system_design_handler::<L>),
        )
        .route(
            "/api/system-design/end",
            post(end_system_design_handler::<L>),
        )
        .route(
            "/api/system-design/session/{id}",
            get(get_system_design_session_handler::<L>),
        )
        .route("/api/llm/grade", post(grade_answer_handler::<L>))
        .route("/api/mock/start", post(start_mock_handler::<L>))
        .route("/api/mock/answer", post(answer_mock_handler::<L>))
        .route("/api/mock/end", post(end_mock_handler::<L>))
        .route("/api/mock/history", get(interview_history_handler::<L>))
        .route(
            "/api/coach-agent/profile",
            get(get_coach_profile_handler::<L>).put(put_coach_profile_handler::<L>),
        )
        .route("/api/coach-agent/ability-map", get(ability_map_handler::<L>))
        .route("/api/coach-agent/advise", post(advise_handler::<L>))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&auth),
            auth_middleware,
        ));

    let admin = Router::new()
        .route(
            "/api/questions/{category}/generate",
            post(generate_questions_handler::<L>),
        )
        .route("/api/llm/generate", post(generate_llm_questions_handler::<L>))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    public
        .merge(protected)
        .merge(admin)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
