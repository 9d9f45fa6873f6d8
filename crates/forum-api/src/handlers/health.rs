//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use forum_service::dto::{HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let (db, sessions) = tokio::join!(ctx.reaction_store().ping(), ctx.provider_sessions().ping());
    if let Err(e) = &db {
        warn!(error = %e, "Database readiness probe failed");
    }
    if let Err(e) = &sessions {
        warn!(error = %e, "Session store readiness probe failed");
    }

    let response = ReadinessResponse::ready(db.is_ok(), sessions.is_ok());
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
