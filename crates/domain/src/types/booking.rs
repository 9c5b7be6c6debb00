//! Booking record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::room::Room;

/// A room reservation as served to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub room: Room,
    /// `None` while the room has not answered (or confirmation was skipped).
    pub room_accepted: Option<bool>,
}

impl Booking {
    /// Whether `now` falls inside the booking, bounds inclusive.
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}
