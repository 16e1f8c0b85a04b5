//! News preview endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use insights_core::Aggregation;
use serde::Deserialize;

use super::insights::{error_response, NO_INDUSTRY_MESSAGE, NO_UPDATES_MESSAGE};
use crate::AppState;

/// Query parameters for the news preview
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub industry: String,
    /// Maximum number of articles to scrape
    pub max_articles: Option<usize>,
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/news", get(get_industry_news))
}

/// GET /api/news - The records a prompt would be built from, without generation
async fn get_industry_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Response {
    let request = state
        .insight_service
        .request_capped(params.industry, params.max_articles);

    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    match state.insight_service.aggregate_news(&request, &cancel).await {
        Ok(Aggregation::Records(records)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "industry": request.trimmed_industry(),
                "count": records.len(),
                "articles": records
            })),
        )
            .into_response(),
        Ok(Aggregation::NoIndustry) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "no_industry",
                "message": NO_INDUSTRY_MESSAGE
            })),
        )
            .into_response(),
        Ok(Aggregation::NoUpdates) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "no_updates",
                "message": NO_UPDATES_MESSAGE
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
