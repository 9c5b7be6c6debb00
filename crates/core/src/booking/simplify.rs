//! Provider record → application record mapping
//!
//! Pure functions. Provider field names stop here; everything above works on
//! [`Room`] and [`Booking`].

use chrono::{DateTime, Utc};
use roombook_domain::{
    Attendee, Booking, CalendarEvent, DirectoryResource, ResponseStatus, Result, Room,
    RoombookError,
};

/// Flatten a directory resource into a [`Room`]. `nextCalendarEvent` starts
/// out as free; availability is filled in separately.
pub fn simplify_room(resource: &DirectoryResource) -> Room {
    Room {
        id: resource.resource_email.clone().unwrap_or_default(),
        name: resource.resource_name.clone().unwrap_or_default(),
        capacity: resource.capacity.unwrap_or(0),
        building: resource.building_id.clone().unwrap_or_default(),
        floor: resource.floor_name.clone().unwrap_or_default(),
        features: resource
            .feature_instances
            .iter()
            .map(|instance| instance.feature.name.clone())
            .collect(),
        next_calendar_event: None,
        location: resource.generated_resource_name.clone().unwrap_or_default(),
    }
}

/// Build a [`Booking`] from an event and the room it reserves.
///
/// Fails with `Integrity` if the id, either timestamp or the room is missing.
/// `room_accepted` is left unknown for the caller to decide.
pub fn simplify_event(event: &CalendarEvent, room: Option<Room>) -> Result<Booking> {
    let id = event
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| RoombookError::Integrity("event has no id".into()))?;
    let start_time = event
        .start
        .ok_or_else(|| RoombookError::Integrity(format!("event {id} has no start time")))?;
    let end_time = event
        .end
        .ok_or_else(|| RoombookError::Integrity(format!("event {id} has no end time")))?;
    let room = room
        .filter(|room| !room.is_empty())
        .ok_or_else(|| RoombookError::Integrity(format!("event {id} has no room")))?;

    Ok(Booking { id: id.to_string(), start_time, end_time, room, room_accepted: None })
}

/// Keep bookings with a room that are running at `now` (bounds inclusive).
pub fn filter_currently_running(bookings: Vec<Booking>, now: DateTime<Utc>) -> Vec<Booking> {
    bookings
        .into_iter()
        .filter(|booking| !booking.room.is_empty() && booking.is_running_at(now))
        .collect()
}

/// The attendee entry for `room_id`, if the room is still on the event.
pub fn find_room_attendee<'a>(event: &'a CalendarEvent, room_id: &str) -> Option<&'a Attendee> {
    event.attendee(room_id)
}

/// The first resource attendee, used when the room id is not known up front.
pub fn find_resource_attendee(event: &CalendarEvent) -> Option<&Attendee> {
    event.resource_attendee()
}

/// `roomAccepted` as far as the current attendee state tells: unknown while
/// the room has not answered.
pub fn acceptance_from_status(status: ResponseStatus) -> Option<bool> {
    status.is_settled().then_some(status == ResponseStatus::Accepted)
}
