//! Calendar provider adapters

pub mod google;
mod types;

pub use google::GoogleCalendarGateway;
