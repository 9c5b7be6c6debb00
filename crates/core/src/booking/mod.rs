//! Booking lifecycle: validation, availability, acceptance polling, rollback

pub mod acceptance;
pub mod poll;
pub mod service;
pub mod simplify;
pub mod validation;

pub use acceptance::{await_room_acceptance, DeclineReason, RoomAcceptance};
pub use poll::{poll_until, PollOutcome, PollPolicy, PollStep};
pub use service::{BookingContext, BookingService, BookingStage};
pub use validation::{validate_booking_id, validate_booking_input, validate_time_to_add, BookingInput};
