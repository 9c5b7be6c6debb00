//! Free/busy interpretation

use chrono::{DateTime, Duration, Utc};

/// A free/busy result means "free" when it equals the window end.
pub fn is_free(result: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    result == end
}

/// Like [`is_free`], accepting results within `tolerance` of the window end
/// on either side.
pub fn is_free_within(result: DateTime<Utc>, end: DateTime<Utc>, tolerance: Duration) -> bool {
    (result - end).abs() <= tolerance
}
