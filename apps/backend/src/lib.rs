pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StoreBackend};
use crate::db::{MemoryStore, PgStore, SleepStore};
use crate::services::sleep::SleepService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sleep: Arc<SleepService>,
}

impl AppState {
    pub fn new(store: Arc<dyn SleepStore>) -> Self {
        Self {
            sleep: Arc::new(SleepService::new(store)),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/entries",
            get(routes::entries::list)
                .post(routes::entries::create)
                .delete(routes::entries::clear),
        )
        .route("/api/entries/:id", delete(routes::entries::delete_one))
        .route("/api/dates", get(routes::entries::dates))
        .route("/api/metrics", get(routes::metrics::daily))
        .route("/api/metrics/monthly", get(routes::metrics::monthly))
        .route(
            "/api/settings/sleep",
            get(routes::settings::get).post(routes::settings::update),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn SleepStore> = match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

            tracing::info!("Connecting to database...");
            let store = PgStore::connect(database_url, config.max_connections).await?;

            tracing::info!("Running migrations...");
            store.run_migrations().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; entries are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let app = build_router(AppState::new(store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
