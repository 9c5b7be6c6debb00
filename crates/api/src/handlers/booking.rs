//! Booking endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use roombook_core::booking::{validate_booking_input, validate_time_to_add};
use roombook_domain::{Booking, Result, RoombookError};
use serde::Deserialize;
use serde_json::Value;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::CurrentSession;
use crate::utils::logging::log_request_outcome;

/// Query parameters of `POST /booking`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookingQuery {
    #[serde(rename = "noConfirmation")]
    pub no_confirmation: Option<String>,
}

impl CreateBookingQuery {
    /// `noConfirmation` as a flag; absent means `default`.
    pub fn resolve(&self, default: bool) -> Result<bool> {
        match self.no_confirmation.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => Ok(true),
            Some(value) if value.eq_ignore_ascii_case("false") || value == "0" => Ok(false),
            Some(value) => Err(RoombookError::Validation(format!(
                "noConfirmation must be true or false, got {value:?}"
            ))),
        }
    }
}

/// `POST /booking`
///
/// The booking flow runs on its own task: a client that disconnects mid-way
/// does not interrupt a create or rollback already in progress.
pub async fn create_booking(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<CreateBookingQuery>,
    body: Bytes,
) -> ApiResult<Json<Booking>> {
    let started = Instant::now();
    let default = ctx.config.booking.no_confirmation_default;

    let result: Result<Booking> = async move {
        let no_confirmation = query.resolve(default)?;
        let input = validate_booking_input(&parse_body(&body)?)?;

        let task_ctx = ctx.clone();
        let handle = tokio::spawn(async move {
            task_ctx
                .bookings
                .create_booking(
                    &session.access_token,
                    &session.email,
                    input,
                    no_confirmation,
                    &task_ctx.shutdown,
                )
                .await
        });
        join_booking_task(handle).await
    }
    .await;

    log_request_outcome("booking::create", started.elapsed(), &result);
    Ok(Json(result?))
}

/// `GET /booking/current`
pub async fn current_bookings(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<Vec<Booking>>> {
    let started = Instant::now();
    let result = ctx.bookings.current_bookings(&session.access_token).await;
    log_request_outcome("booking::current", started.elapsed(), &result);
    Ok(Json(result?))
}

/// `GET /booking/{id}`
pub async fn get_booking(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let started = Instant::now();
    let result = ctx.bookings.get_booking(&session.access_token, &id).await;
    log_request_outcome("booking::get", started.elapsed(), &result);
    Ok(Json(result?))
}

/// `DELETE /booking/{id}`
pub async fn delete_booking(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let started = Instant::now();
    let result = ctx.bookings.delete_booking(&session.access_token, &id).await;
    log_request_outcome("booking::delete", started.elapsed(), &result);
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /booking/{id}` with `{"timeToAdd": minutes}`
pub async fn add_time(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Booking>> {
    let started = Instant::now();

    let result: Result<Booking> = async move {
        let minutes = validate_time_to_add(&parse_body(&body)?)?;

        let task_ctx = ctx.clone();
        let handle = tokio::spawn(async move {
            task_ctx
                .bookings
                .add_time(&session.access_token, &id, minutes, &task_ctx.shutdown)
                .await
        });
        join_booking_task(handle).await
    }
    .await;

    log_request_outcome("booking::add_time", started.elapsed(), &result);
    Ok(Json(result?))
}

/// Request bodies are read as raw JSON so that shape errors surface as
/// validation errors rather than extractor rejections.
fn parse_body(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(RoombookError::Validation("request body is required".into()));
    }
    serde_json::from_slice(body)
        .map_err(|err| RoombookError::Validation(format!("request body is not valid JSON: {err}")))
}

async fn join_booking_task(handle: tokio::task::JoinHandle<Result<Booking>>) -> Result<Booking> {
    handle
        .await
        .map_err(|err| RoombookError::Internal(format!("booking task failed: {err}")))?
}
