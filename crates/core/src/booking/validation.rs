//! Input validation for booking requests
//!
//! Everything here runs before any gateway call; a rejection means nothing
//! was written upstream.

use roombook_domain::constants::{BOOKING_ID_LENGTH, MAX_BOOKING_MINUTES};
use roombook_domain::{Result, RoombookError};
use serde_json::Value;

/// Validated body of a create-booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingInput {
    /// Room resource email.
    pub room_id: String,
    /// Event summary.
    pub title: String,
    /// Minutes, in `1..=MAX_BOOKING_MINUTES`.
    pub duration_minutes: i64,
}

/// Validate a create-booking body: `roomId` and `title` non-empty strings,
/// `duration` a positive integer number of minutes, at most a day.
pub fn validate_booking_input(body: &Value) -> Result<BookingInput> {
    let room_id = required_string(body, "roomId")?;
    let title = required_string(body, "title")?;
    let duration_minutes = positive_minutes(body, "duration")?;

    Ok(BookingInput { room_id, title, duration_minutes })
}

/// Validate an add-time body: `timeToAdd` a positive integer of minutes, at
/// most a day.
pub fn validate_time_to_add(body: &Value) -> Result<i64> {
    positive_minutes(body, "timeToAdd")
}

/// Provider ids are exactly 26 characters. Anything else cannot name an
/// event, so it is rejected without a round-trip.
pub fn validate_booking_id(id: &str) -> Result<()> {
    if id.chars().count() != BOOKING_ID_LENGTH {
        return Err(RoombookError::Validation(format!(
            "invalid booking id: expected {BOOKING_ID_LENGTH} characters"
        )));
    }
    Ok(())
}

fn required_string(body: &Value, field: &str) -> Result<String> {
    match body.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => {
            Err(RoombookError::Validation(format!("{field} must not be empty")))
        }
        Some(_) => Err(RoombookError::Validation(format!("{field} must be a string"))),
        None => Err(RoombookError::Validation(format!("missing {field}"))),
    }
}

fn positive_minutes(body: &Value, field: &str) -> Result<i64> {
    let value = body
        .get(field)
        .ok_or_else(|| RoombookError::Validation(format!("missing {field}")))?;

    // Integral floats such as `60.0` are not accepted; the client sends whole
    // minutes.
    let minutes = value
        .as_i64()
        .ok_or_else(|| RoombookError::Validation(format!("{field} must be an integer")))?;

    check_minutes(field, minutes)
}

/// Range check shared by both bodies and by callers that skip JSON parsing.
pub fn check_minutes(field: &str, minutes: i64) -> Result<i64> {
    if minutes <= 0 {
        return Err(RoombookError::Validation(format!("{field} must be positive")));
    }
    if minutes > MAX_BOOKING_MINUTES {
        return Err(RoombookError::Validation(format!(
            "{field} must be at most {MAX_BOOKING_MINUTES} minutes"
        )));
    }
    Ok(minutes)
}
