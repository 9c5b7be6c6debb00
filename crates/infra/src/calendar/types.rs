//! Google Calendar / Admin Directory wire types
//!
//! Only the fields the gateway reads or writes are modelled; everything else
//! in the provider payloads is ignored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use roombook_domain::{Attendee, Building, CalendarEvent, DirectoryResource, ResponseStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FreeBusyRequest<'a> {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FreeBusyItem<'a> {
    pub id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<TimePeriod>,
    #[serde(default)]
    pub errors: Vec<FreeBusyError>,
}

impl FreeBusyCalendar {
    /// `end` when nothing is busy, else the earliest busy start.
    pub fn next_busy_or(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        self.busy.iter().map(|period| period.start).min().unwrap_or(end)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimePeriod {
    pub start: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FreeBusyError {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    /// All-day events carry a date instead of a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventDateTime {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self { date_time: Some(time), date: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleAttendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl From<&Attendee> for GoogleAttendee {
    fn from(attendee: &Attendee) -> Self {
        Self {
            email: attendee.email.clone(),
            resource: attendee.resource.then_some(true),
            response_status: Some(attendee.response_status.to_string()),
        }
    }
}

impl From<GoogleAttendee> for Attendee {
    fn from(attendee: GoogleAttendee) -> Self {
        let response_status = attendee
            .response_status
            .as_deref()
            .and_then(|status| status.parse::<ResponseStatus>().ok())
            .unwrap_or_default();
        Self { email: attendee.email, resource: attendee.resource.unwrap_or(false), response_status }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleOrganizer {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
    #[serde(default)]
    pub attendees: Vec<GoogleAttendee>,
    #[serde(default)]
    pub organizer: Option<GoogleOrganizer>,
}

impl From<GoogleEvent> for CalendarEvent {
    fn from(event: GoogleEvent) -> Self {
        Self {
            id: event.id,
            summary: event.summary,
            start: event.start.and_then(|start| start.date_time),
            end: event.end.and_then(|end| end.date_time),
            attendees: event.attendees.into_iter().map(Attendee::from).collect(),
            organizer_email: event.organizer.and_then(|organizer| organizer.email),
        }
    }
}

/// Body of an event insert.
#[derive(Debug, Serialize)]
pub(crate) struct EventInsert<'a> {
    pub summary: &'a str,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<GoogleAttendee>,
}

/// Body of an end-time patch.
#[derive(Debug, Serialize)]
pub(crate) struct EventPatch {
    pub end: EventDateTime,
    pub attendees: Vec<GoogleAttendee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceList {
    #[serde(default)]
    pub items: Vec<DirectoryResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleBuilding {
    pub building_id: String,
    #[serde(default)]
    pub building_name: Option<String>,
}

impl From<GoogleBuilding> for Building {
    fn from(building: GoogleBuilding) -> Self {
        let name = building.building_name.unwrap_or_else(|| building.building_id.clone());
        Self { id: building.building_id, name }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BuildingList {
    #[serde(default)]
    pub buildings: Vec<GoogleBuilding>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google's JSON error envelope: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
