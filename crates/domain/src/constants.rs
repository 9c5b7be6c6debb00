//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Booking identifiers
/// Length of every provider event id.
pub const BOOKING_ID_LENGTH: usize = 26;

/// Longest booking, and longest single extension, in minutes.
pub const MAX_BOOKING_MINUTES: i64 = 24 * 60;

// Acceptance polling
pub const DEFAULT_POLL_ATTEMPTS: u32 = 8;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 125;

// Free/busy
pub const FREE_BUSY_BATCH_SIZE: usize = 50; // provider-imposed limit
pub const EXTEND_TOLERANCE_SECS: i64 = 15;
pub const DEFAULT_ROOM_LOOKAHEAD_HOURS: i64 = 24;

/// Wire value of `nextCalendarEvent` for a room with nothing scheduled.
pub const FREE_SENTINEL: &str = "-1";

// Sessions
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;
pub const LOGIN_STATE_TTL_SECS: u64 = 10 * 60;
