//! Calendar event types exchanged with the calendar gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Invitation response of a single attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    #[default]
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
}

impl_wire_enum_conversions!(ResponseStatus {
    NeedsAction => "needsAction",
    Accepted => "accepted",
    Declined => "declined",
    Tentative => "tentative",
});

impl ResponseStatus {
    /// Whether the attendee has answered the invitation at all.
    pub fn is_settled(self) -> bool {
        self != Self::NeedsAction
    }
}

/// Attendee of a calendar event. Rooms appear as attendees with
/// `resource = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    /// Set for rooms and other directory resources.
    #[serde(default)]
    pub resource: bool,
    #[serde(default)]
    pub response_status: ResponseStatus,
}

impl Attendee {
    /// Room resource invited as a required attendee.
    pub fn room(email: impl Into<String>) -> Self {
        Self { email: email.into(), resource: true, response_status: ResponseStatus::NeedsAction }
    }

    /// Organizer, who has implicitly accepted their own booking.
    pub fn organizer(email: impl Into<String>) -> Self {
        Self { email: email.into(), resource: false, response_status: ResponseStatus::Accepted }
    }
}

/// Calendar event as returned by the gateway.
///
/// Every field the provider may omit is optional here; the simplifier is
/// responsible for rejecting events that lack what a booking needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Email of the organizer, when the provider names one.
    pub organizer_email: Option<String>,
}

impl CalendarEvent {
    /// Attendee whose email matches `email` (case-insensitive).
    pub fn attendee(&self, email: &str) -> Option<&Attendee> {
        self.attendees.iter().find(|attendee| attendee.email.eq_ignore_ascii_case(email))
    }

    /// First attendee flagged as a resource.
    pub fn resource_attendee(&self) -> Option<&Attendee> {
        self.attendees.iter().find(|attendee| attendee.resource)
    }
}

/// Parameters for creating a booking event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub room_id: String,
    pub organizer_email: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
