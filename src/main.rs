//! News Portal Backend
//!
//! Read-only REST and JSON-RPC API over the PostgreSQL news tables.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod service;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use service::NewsService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub news: NewsService,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Starting News Portal Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(
        "Database pool: max_conns={}, max_conn_lifetime={:?}, query_timeout={:?}",
        config.database.max_conns,
        config.database.max_conn_lifetime,
        config.database.query_timeout
    );

    // Initialize database
    let pool = db::init_database(&config.database).await?;
    let repo = Arc::new(Repository::new(pool.clone(), config.database.query_timeout));

    // Create application state
    let state = AppState {
        news: NewsService::new(repo),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/all_news", get(api::list_news))
        .route("/count", get(api::count_news))
        .route("/news/{id}", get(api::get_news))
        .route("/categories", get(api::list_categories))
        .route("/tags", get(api::list_tags));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/rpc", get(api::rpc_describe).post(api::rpc_handler))
        .route("/health", get(api::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
