//! Insight generation endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use insights_core::InsightsError;
use insights_services::InsightOutcome;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;

pub const NO_INDUSTRY_MESSAGE: &str = "Please enter an industry to generate insights.";
pub const NO_UPDATES_MESSAGE: &str = "No recent updates found.";

/// Body for POST /api/insights
#[derive(Debug, Deserialize)]
pub struct InsightsBody {
    #[serde(default)]
    pub industry: String,
    pub max_articles: Option<usize>,
}

/// Create insight routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/insights", post(generate_insights))
}

/// POST /api/insights - Aggregate news for an industry and generate a report
async fn generate_insights(
    State(state): State<AppState>,
    Json(body): Json<InsightsBody>,
) -> Response {
    let request = state
        .insight_service
        .request_capped(body.industry, body.max_articles);

    // Cancels the pipeline if the client goes away or the server shuts down
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    match state.insight_service.generate_insights(&request, &cancel).await {
        Ok(InsightOutcome::Report(report)) => {
            info!(
                "Returning insights for '{}' ({} articles)",
                report.industry,
                report.articles.len()
            );
            let mut json = serde_json::json!({ "status": "ok" });
            if let (Some(obj), Ok(serde_json::Value::Object(fields))) =
                (json.as_object_mut(), serde_json::to_value(&report))
            {
                obj.extend(fields);
            }
            (StatusCode::OK, Json(json)).into_response()
        }
        Ok(InsightOutcome::NoIndustry) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "no_industry",
                "message": NO_INDUSTRY_MESSAGE
            })),
        )
            .into_response(),
        Ok(InsightOutcome::NoUpdates) => (
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

pub(crate) fn error_response(e: InsightsError) -> Response {
    let status = match &e {
        InsightsError::Generation(_) => StatusCode::BAD_GATEWAY,
        InsightsError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        InsightsError::Config(_) | InsightsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if e.is_user_visible() {
        error!("Insights request failed: {}", e);
    } else {
        info!("Insights request ended: {}", e);
    }
    (
        status,
        Json(serde_json::json!({
            "error": e.to_string()
        })),
    )
        .into_response()
}
