//! Calendar gateway port
//!
//! The narrow interface the booking orchestration needs from an external
//! calendar/directory provider. Any provider offering free/busy, event CRUD
//! and resource listing satisfies it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roombook_domain::{
    AccessToken, Attendee, Building, CalendarEvent, DirectoryResource, NewEvent, Result,
};

/// Trait for calendar provider operations
///
/// Every call is a single round-trip with no internal retry; callers own
/// retry and polling policy.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// For each queried id, `end` if nothing conflicts in `[start, end)`,
    /// otherwise the start of the first conflicting event. Ids the provider
    /// could not resolve are absent from the map.
    async fn free_busy_query(
        &self,
        token: &AccessToken,
        ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, DateTime<Utc>>>;

    /// Create an event inviting the room and the (accepted) organizer.
    async fn create_event(&self, token: &AccessToken, event: &NewEvent) -> Result<CalendarEvent>;

    /// Fetch an event. `NotFound` when absent, deleted or malformed.
    async fn get_event(&self, token: &AccessToken, event_id: &str) -> Result<CalendarEvent>;

    /// Rewrite the end timestamp and attendee states of an event.
    async fn update_end_time(
        &self,
        token: &AccessToken,
        event_id: &str,
        new_end: DateTime<Utc>,
        attendees: &[Attendee],
    ) -> Result<CalendarEvent>;

    /// Delete an event. An event that is already gone counts as deleted.
    async fn delete_event(&self, token: &AccessToken, event_id: &str) -> Result<()>;

    /// The caller's own events overlapping `[start, end)`.
    async fn list_user_events(
        &self,
        token: &AccessToken,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;

    /// Bookable rooms, optionally restricted to one building.
    async fn list_rooms(
        &self,
        token: &AccessToken,
        building: Option<&str>,
    ) -> Result<Vec<DirectoryResource>>;

    /// Single room by resource email.
    async fn get_room(&self, token: &AccessToken, email: &str) -> Result<DirectoryResource>;

    async fn list_buildings(&self, token: &AccessToken) -> Result<Vec<Building>>;
}
