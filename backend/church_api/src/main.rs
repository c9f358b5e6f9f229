//! PIB do Cordeiro church API entry point.
//!
//! Serves the prayer-request store (public feed, submissions and moderator
//! transitions) together with events, the reading plan and static church
//! data, all as JSON under `/api`.

mod api;
mod catalog;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    if config.seed_sample_data {
        db::seed_sample_data(&pool, chrono::Utc::now()).await?;
    }

    let state = Arc::new(api::ApiState {
        pool,
        feed_limit: config.feed_limit,
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<api::ApiState>) -> Router {
    let routes = Router::new()
        .route("/", get(api::root))
        .route("/events", get(api::get_events).post(api::create_event))
        .route("/events/next", get(api::get_next_event))
        .route(
            "/prayer-requests",
            get(api::get_prayer_requests).post(api::create_prayer_request),
        )
        .route(
            "/prayer-requests/:id/approve",
            patch(api::approve_prayer_request),
        )
        .route(
            "/prayer-requests/:id/reject",
            patch(api::reject_prayer_request),
        )
        .route(
            "/prayer-requests/:id/answer",
            patch(api::answer_prayer_request),
        )
        .route("/reading-plan", get(api::get_reading_plan))
        .route("/reading-plan/today", get(api::get_today_reading))
        .route("/ministries", get(api::get_ministries))
        .route("/media-links", get(api::get_media_links))
        .route("/church-info", get(api::get_church_info));

    Router::new()
        .route("/health", get(api::health))
        .nest("/api", routes)
        .fallback(api::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
