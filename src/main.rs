use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod perf;
mod repo;
mod validation;

use config::Config;
use repo::MoodRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: MoodRepository,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![state
            .config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        for o in &state.config.cors_extra_origins {
            if let Ok(hv) = o.parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/moods", post(handlers::moods::create_mood))
        .route("/api/moods", get(handlers::moods::list_moods))
        // Static segment registered alongside :date; axum prefers it.
        .route("/api/moods/stats", get(handlers::moods::get_statistics))
        .route("/api/moods/:date", get(handlers::moods::get_mood))
        .route("/api/moods/:date", delete(handlers::moods::delete_mood))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database: pool opened once here, closed when the process exits.
    let pool = db::create_pool(&config.database_url, config.database_key.as_deref()).await;
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    tracing::info!(
        encryption = config.encryption_enabled(),
        "Database schema ready"
    );

    let state = AppState {
        repo: MoodRepository::new(pool),
        config: config.clone(),
    };

    let app = router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
