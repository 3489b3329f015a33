//! Recommendation API surface.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use chrono::Utc;
use deskmatch_core::{Desk, DeskMatcher, EmployeeId, RecommendationRequest};
use deskmatch_data::ReferenceDataProvider;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

pub const MAX_QUERY_LENGTH: usize = 200;

#[derive(Clone)]
pub struct ApiState {
    pub provider: Arc<dyn ReferenceDataProvider>,
    pub matcher: Arc<DeskMatcher>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationBody {
    #[serde(default)]
    pub employee_id: Option<String>,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Desk>,
    pub count: usize,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/api/recommendations", post(recommendations)).with_state(state)
}

pub async fn recommendations(
    State(state): State<ApiState>,
    Json(body): Json<RecommendationBody>,
) -> Result<Json<RecommendationsResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let query = body.query.trim();
    if query.is_empty() {
        return Err(bad_request("query must not be empty", &correlation_id));
    }
    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(bad_request(
            &format!("query must be at most {MAX_QUERY_LENGTH} characters"),
            &correlation_id,
        ));
    }

    let employee_id = body
        .employee_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| EmployeeId(id.to_string()));

    info!(
        event_name = "api.recommendations.request",
        correlation_id = %correlation_id,
        employee_id = employee_id.as_ref().map(|id| id.0.as_str()).unwrap_or("anonymous"),
        query_length = query.chars().count(),
        "recommendation request received"
    );

    let snapshot = state.provider.load().await.map_err(|source| {
        error!(
            event_name = "api.recommendations.snapshot_failed",
            correlation_id = %correlation_id,
            error = %source,
            "reference data load failed"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: "reference data is unavailable".to_string(),
                correlation_id: correlation_id.clone(),
            }),
        )
    })?;

    let request = RecommendationRequest { employee_id, query: query.to_string() };
    let recommendations = state.matcher.recommend(&request, &snapshot, Utc::now()).await;

    info!(
        event_name = "api.recommendations.completed",
        correlation_id = %correlation_id,
        count = recommendations.len(),
        "recommendation request completed"
    );

    Ok(Json(RecommendationsResponse {
        count: recommendations.len(),
        recommendations,
        correlation_id,
    }))
}

fn bad_request(message: &str, correlation_id: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError { error: message.to_string(), correlation_id: correlation_id.to_string() }),
    )
}
