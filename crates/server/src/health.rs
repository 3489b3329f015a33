use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use deskmatch_data::ReferenceDataProvider;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    provider: Arc<dyn ReferenceDataProvider>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub reference_data: HealthCheck,
    pub checked_at: String,
}

pub fn router(provider: Arc<dyn ReferenceDataProvider>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { provider })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let reference_data = snapshot_check(state.provider.as_ref()).await;
    let ready = reference_data.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "deskmatch-server runtime initialized".to_string(),
        },
        reference_data,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn snapshot_check(provider: &dyn ReferenceDataProvider) -> HealthCheck {
    match provider.load().await {
        Ok(snapshot) => HealthCheck {
            status: "ready",
            detail: format!("snapshot loaded with {} desks", snapshot.desks.len()),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("snapshot load failed: {error}") }
        }
    }
}
