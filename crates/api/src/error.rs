//! HTTP mapping of domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roombook_domain::RoombookError;
use serde::Serialize;

/// Error body: `{"code": <http status>, "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status, repeated in the body.
    pub code: u16,
    /// Human-readable reason.
    pub message: String,
}

/// Wrapper that lets handlers return domain errors directly.
#[derive(Debug)]
pub struct ApiError(pub RoombookError);

impl From<RoombookError> for ApiError {
    fn from(value: RoombookError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details stay in the logs.
        let message = match &self.0 {
            RoombookError::Database(_) | RoombookError::Internal(_) | RoombookError::Config(_) => {
                "internal server error".to_string()
            }
            other => other.message().to_string(),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
