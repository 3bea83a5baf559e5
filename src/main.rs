//! battlelog-api server entry point.
//!
//! Starts the Axum HTTP server over the PostgreSQL battle log.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use battlelog_api::api;
use battlelog_api::app_state::AppState;
use battlelog_api::config::ApiConfig;
use battlelog_api::persistence::BattleStore;
use battlelog_api::service::StatsService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ApiConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting battlelog-api");

    // Connect to the battle log database
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    let store = Arc::new(BattleStore::new(pool));
    if config.schema_init {
        store.init_schema().await?;
    }

    // Build service and application state
    let stats = Arc::new(StatsService::new(Arc::clone(&store)));
    let app_state = AppState { store, stats };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
