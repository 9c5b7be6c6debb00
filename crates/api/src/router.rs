//! Route table

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::context::AppContext;
use crate::handlers::{auth, booking, health, preferences, rooms};

/// Build the application router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Login
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        // Bookings
        .route("/booking", post(booking::create_booking))
        .route("/booking/current", get(booking::current_bookings))
        .route(
            "/booking/{id}",
            get(booking::get_booking).delete(booking::delete_booking).patch(booking::add_time),
        )
        // Directory
        .route("/rooms", get(rooms::list_rooms))
        .route("/buildings", get(rooms::list_buildings))
        .route("/preferences", get(preferences::get_preferences).put(preferences::set_preferences))
        .with_state(ctx)
}
