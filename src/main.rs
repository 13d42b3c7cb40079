use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod db;
mod error;
mod models;
mod services;
mod utils;

use config::Config;
use db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omnom_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting OMNOM score backend");
    tracing::info!("Environment: {}", config.environment);

    // Initialize database
    let db = Database::new(&config).await?;

    tracing::info!("Running database migrations...");
    db.run_migrations().await?;

    let app_state = api::AppState::new(db, config.clone());
    let app = build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Player identity
        .route("/generate-name", get(api::names::generate_name))
        .route("/update_wallet", post(api::wallet::update_wallet))
        .route(
            "/check_wallet_username",
            post(api::wallet::check_wallet_username),
        )
        .route(
            "/check_wallet_status",
            post(api::wallet::check_wallet_status),
        )
        // Scores
        .route("/submit_score", post(api::scores::submit_score))
        .route("/get_user_score", get(api::scores::get_user_score))
        .route("/get_total_points", get(api::scores::get_total_points))
        .route("/get_stats", get(api::scores::get_stats))
        // Leaderboards
        .route("/leaderboard", get(api::leaderboard::leaderboard))
        .route("/get_leaderboard", get(api::leaderboard::get_leaderboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
