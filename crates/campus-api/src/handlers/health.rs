//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode};
use campus_service::dto::{HealthResponse, ReadinessResponse};

use crate::response::ApiJson;
use crate::state::AppState;

/// GET /health
pub async fn health_check() -> ApiJson<HealthResponse> {
    ApiJson(HealthResponse::healthy())
}

/// GET /health/ready
///
/// 503 unless both PostgreSQL and Redis answer.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, ApiJson<ReadinessResponse>) {
    let ctx = state.service_context();

    let db_healthy = ctx.pool().acquire().await.is_ok();
    let redis_healthy = ctx.redis_pool().health_check().await.is_ok();

    let response = ReadinessResponse::new(db_healthy, redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, ApiJson(response))
}
