//! Preference endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use roombook_domain::{Preferences, RoombookError};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::CurrentSession;
use crate::utils::logging::log_request_outcome;

/// `GET /preferences`
pub async fn get_preferences(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<Preferences>> {
    let started = Instant::now();
    let result = ctx.preferences.get(&session.subject).await;
    log_request_outcome("preferences::get", started.elapsed(), &result);
    Ok(Json(result?))
}

/// `PUT /preferences` with `{"building": {"id", "name"} | null}`
pub async fn set_preferences(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    body: Bytes,
) -> ApiResult<Json<Preferences>> {
    let started = Instant::now();

    let result = match serde_json::from_slice::<Preferences>(&body) {
        Ok(preferences) => ctx.preferences.set(&session.subject, preferences).await,
        Err(err) => Err(RoombookError::Validation(format!("invalid preferences: {err}"))),
    };

    log_request_outcome("preferences::set", started.elapsed(), &result);
    Ok(Json(result?))
}
