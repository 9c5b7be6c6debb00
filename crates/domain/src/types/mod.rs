//! Domain types and models

pub mod booking;
pub mod event;
pub mod room;
pub mod user;

pub use booking::Booking;
pub use event::{Attendee, CalendarEvent, NewEvent, ResponseStatus};
pub use room::{Building, DirectoryResource, Feature, FeatureInstance, Room};
pub use user::{AccessToken, Preferences, Session, UserRecord};
