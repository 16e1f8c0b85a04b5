//! Industry Insights API Server
//!
//! HTTP API server that turns an industry name into a news-grounded
//! insights report.

mod config;
mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use insights_services::{InsightService, NewsAggregator};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub insight_service: Arc<InsightService>,
    pub generator_name: String,
    /// Cancelled on shutdown; requests run on child tokens
    pub shutdown: CancellationToken,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,insights_api=debug")),
        )
        .init();

    info!("Starting Industry Insights API");

    let config = AppConfig::from_env().inspect_err(|e| error!("{}", e))?;

    // Initialize generators
    let generator = config
        .primary
        .provider
        .build(config.primary.api_key.clone(), config.primary.generation.clone())?;
    let generator_name = format!("{}:{}", generator.name(), config.primary.generation.model);
    info!("Using generator {}", generator_name);

    // Initialize pipeline
    let aggregator = NewsAggregator::from_config(&config.pipeline)?;
    let mut insight_service =
        InsightService::new(aggregator, generator, config.pipeline.clone());

    if let Some(summary) = &config.summary {
        let summarizer = summary
            .provider
            .build(summary.api_key.clone(), summary.generation.clone())?;
        info!(
            "Two-stage summary enabled ({}:{})",
            summarizer.name(),
            summary.generation.model
        );
        insight_service = insight_service.with_summarizer(summarizer);
    }

    let shutdown = CancellationToken::new();

    // Create app state
    let state = AppState {
        insight_service: Arc::new(insight_service),
        generator_name,
        shutdown: shutdown.clone(),
    };

    let app = app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, cancelling in-flight requests");
    shutdown.cancel();
}
