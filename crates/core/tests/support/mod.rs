//! Shared test helpers for `roombook-core` integration tests.
//!
//! A scripted calendar gateway that records every call, an in-memory user
//! repository, and a few event/room fixtures.

#![allow(dead_code)]

pub mod gateway;
pub mod users;

use chrono::{DateTime, TimeZone, Utc};
use roombook_domain::{Attendee, CalendarEvent, DirectoryResource, ResponseStatus};

pub const ROOM_ID: &str = "kallio@resource.calendar.google.com";
pub const ORGANIZER: &str = "alex@example.com";
/// 26 characters, like provider event ids.
pub const EVENT_ID: &str = "abcdefghijklmnopqrstuvwxyz";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()
}

pub fn room_resource(email: &str) -> DirectoryResource {
    DirectoryResource {
        resource_email: Some(email.to_string()),
        resource_name: Some("Kallio".into()),
        capacity: Some(8),
        building_id: Some("HQ".into()),
        floor_name: Some("3".into()),
        generated_resource_name: Some("HQ-3-Kallio (8)".into()),
        ..DirectoryResource::default()
    }
}

/// Event with the organizer and the room as attendees, room in `status`.
pub fn event_with_room(
    id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: ResponseStatus,
) -> CalendarEvent {
    let mut room = Attendee::room(ROOM_ID);
    room.response_status = status;
    CalendarEvent {
        id: Some(id.to_string()),
        summary: Some("Standup".into()),
        start: Some(start),
        end: Some(end),
        attendees: vec![Attendee::organizer(ORGANIZER), room],
        organizer_email: Some(ORGANIZER.into()),
    }
}

/// Same event with the room removed from the attendee list.
pub fn event_without_room(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: Some(id.to_string()),
        summary: Some("Standup".into()),
        start: Some(start),
        end: Some(end),
        attendees: vec![Attendee::organizer(ORGANIZER)],
        organizer_email: Some(ORGANIZER.into()),
    }
}
