//! Room and building endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use roombook_domain::{Building, Room};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::CurrentSession;
use crate::utils::logging::log_request_outcome;

/// Query parameters of `GET /rooms`.
#[derive(Debug, Default, Deserialize)]
pub struct RoomsQuery {
    /// Building id to restrict the listing to.
    pub building: Option<String>,
}

/// `GET /rooms?building=<id>`
pub async fn list_rooms(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<RoomsQuery>,
) -> ApiResult<Json<Vec<Room>>> {
    let started = Instant::now();
    let building = query.building.as_deref().map(str::trim).filter(|b| !b.is_empty());
    let result = ctx.rooms.list_rooms(&session.access_token, building).await;
    log_request_outcome("rooms::list", started.elapsed(), &result);
    Ok(Json(result?))
}

/// `GET /buildings`
pub async fn list_buildings(
    State(ctx): State<Arc<AppContext>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<Vec<Building>>> {
    let started = Instant::now();
    let result = ctx.rooms.list_buildings(&session.access_token).await;
    log_request_outcome("buildings::list", started.elapsed(), &result);
    Ok(Json(result?))
}
