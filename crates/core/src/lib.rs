//! # Roombook Core
//!
//! Booking orchestration and business rules - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (calendar gateway, user repository)
//! - The booking state machine with acceptance polling and rollback
//! - Room availability and preferences services
//!
//! ## Architecture Principles
//! - Only depends on `roombook-domain`
//! - No database, HTTP, or provider code
//! - All external dependencies via traits

pub mod booking;
pub mod calendar_ports;
pub mod clock;
pub mod rooms;
pub mod user;

pub use booking::{BookingContext, BookingInput, BookingService, BookingStage, PollPolicy};
pub use calendar_ports::CalendarGateway;
pub use clock::{Clock, FixedClock, SystemClock};
pub use rooms::RoomService;
pub use user::{PreferencesService, UserRepository};
