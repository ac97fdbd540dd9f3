//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Build revision
    #[schema(example = "a1b2c3d")]
    pub version: String,
}

/// Health check endpoint
///
/// Pings the storage engine. Failure details go to the log only.
///
/// - Healthy: 200 OK + {status: "ok"}
/// - Unhealthy: 503 Service Unavailable + {status: "unavailable"}
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.ledger.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                version: env!("GIT_HASH").to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] Storage ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    version: env!("GIT_HASH").to_string(),
                }),
            )
        }
    }
}
