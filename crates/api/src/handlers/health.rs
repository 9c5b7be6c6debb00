//! Liveness endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// `GET /health`: 200 when every component is healthy, 503 otherwise.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthStatus>) {
    let status = ctx.health_check().await;
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
