//! Health check endpoints

use axum::{extract::State, response::Json, routing::get, Router};
use insights_core::TemplateVariant;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    generator: String,
    template: TemplateVariant,
    max_articles: usize,
    two_stage_summary: bool,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.insight_service.config();

    Json(HealthResponse {
        status: "healthy",
        generator: state.generator_name.clone(),
        template: config.template_variant,
        max_articles: config.max_articles,
        two_stage_summary: config.two_stage_summary,
    })
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
