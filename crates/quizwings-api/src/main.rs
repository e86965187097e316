//! Quiz Wings API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use quizwings_api::config::ApiConfig;
use quizwings_api::error::AppError;
use quizwings_api::routes;
use quizwings_api::state::AppState;
use quizwings_core::clock::SystemClock;
use quizwings_core::repository::{QuizRepository, ResultRepository};
use quizwings_session::application::lifecycle::LifecycleController;
use quizwings_store::MIGRATOR;
use quizwings_store::memory::{
    InMemoryIdentityDirectory, InMemoryQuizRepository, InMemoryResultRepository,
};
use quizwings_store::pg::{PgQuizRepository, PgResultRepository};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Quiz Wings API server");

    let config = ApiConfig::from_env()?;

    let (quizzes, results) = storage(&config).await?;
    let app_state = AppState::new(
        quizzes,
        results,
        Arc::new(InMemoryIdentityDirectory::new()),
        Arc::new(SystemClock),
    );

    if let Some(max_idle) = config.session_idle_timeout {
        spawn_idle_eviction(Arc::clone(&app_state.lifecycle), max_idle)?;
    }

    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL repositories when `DATABASE_URL` is set, in-memory ones otherwise.
async fn storage(
    config: &ApiConfig,
) -> Result<(Arc<dyn QuizRepository>, Arc<dyn ResultRepository>), AppError> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; quizzes and results are kept in memory");
        let quizzes: Arc<dyn QuizRepository> = Arc::new(InMemoryQuizRepository::new());
        let results: Arc<dyn ResultRepository> = Arc::new(InMemoryResultRepository::new());
        return Ok((quizzes, results));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    let quizzes: Arc<dyn QuizRepository> = Arc::new(PgQuizRepository::new(pool.clone()));
    let results: Arc<dyn ResultRepository> = Arc::new(PgResultRepository::new(pool));
    Ok((quizzes, results))
}

/// Checks for idle participants every `max_idle` or every minute, whichever
/// is shorter.
fn spawn_idle_eviction(
    lifecycle: Arc<LifecycleController>,
    max_idle: Duration,
) -> Result<(), AppError> {
    let threshold = chrono::Duration::from_std(max_idle)
        .map_err(|e| AppError::Config(format!("SESSION_IDLE_TIMEOUT_SECS is too large: {e}")))?;
    let period = max_idle.min(Duration::from_secs(60));
    tracing::info!(idle_timeout_secs = max_idle.as_secs(), "idle eviction enabled");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = lifecycle.evict_idle(threshold);
            if !evicted.is_empty() {
                tracing::info!(count = evicted.len(), "idle participants evicted");
            }
        }
    });
    Ok(())
}
