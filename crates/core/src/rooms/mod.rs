//! Rooms, buildings and free/busy

pub mod availability;
pub mod service;

pub use availability::{is_free, is_free_within};
pub use service::RoomService;
