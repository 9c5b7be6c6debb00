//! User records and preferences

pub mod ports;
pub mod service;

pub use ports::UserRepository;
pub use service::PreferencesService;
