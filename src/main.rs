use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use prepforge::application::ports::{
    CoachRepository, HistoryRepository, InterviewRepository, QuestionRepository, StoreHealth,
    UserRepository,
};
use prepforge::application::services::{
    AuthService, CoachService, InterviewService, QuestionService,
};
use prepforge::infrastructure::llm::GeminiClient;
use prepforge::infrastructure::observability::{init_tracing, TracingConfig};
use prepforge::infrastructure::persistence::{
    create_pool, ensure_schema, PgCoachRepository, PgHistoryRepository, PgInterviewRepository,
    PgQuestionRepository, PgStoreHealth, PgUserRepository,
};
use prepforge::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Failed to parse APP_ENVIRONMENT")?;

    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
        default_level: settings.logging.level.clone(),
    });

    let pool = create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .context("Failed to connect to document store")?;
    ensure_schema(&pool).await.context("Failed to verify store schema")?;

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let questions: Arc<dyn QuestionRepository> = Arc::new(PgQuestionRepository::new(pool.clone()));
    let interviews: Arc<dyn InterviewRepository> =
        Arc::new(PgInterviewRepository::new(pool.clone()));
    let history: Arc<dyn HistoryRepository> = Arc::new(PgHistoryRepository::new(pool.clone()));
    let coach: Arc<dyn CoachRepository> = Arc::new(PgCoachRepository::new(pool.clone()));
    let store_health: Arc<dyn StoreHealth> = Arc::new(PgStoreHealth::new(pool));

    let llm_client = Arc::new(
        GeminiClient::with_endpoint(
            settings.ai.api_key.clone(),
            settings.ai.model.clone(),
            settings.ai.temperature,
            settings.ai.max_output_tokens,
            settings.ai.endpoint.clone(),
        )
        .context("Failed to construct AI client")?,
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        settings.auth.jwt_secret.clone(),
        settings.auth.token_ttl_hours,
    ));
    let question_service = Arc::new(QuestionService::new(
        Arc::clone(&llm_client),
        Arc::clone(&questions),
        Arc::clone(&history),
    ));
    let interview_service = Arc::new(InterviewService::new(
        Arc::clone(&llm_client),
        Arc::clone(&interviews),
        Arc::clone(&questions),
        Arc::clone(&history),
    ));
    let coach_service = Arc::new(CoachService::new(
        Arc::clone(&llm_client),
        Arc::clone(&coach),
        Arc::clone(&history),
    ));

    let state = AppState {
        auth_service,
        question_service,
        interview_service,
        coach_service,
        store_health,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
