//! Utility modules for the API crate

pub mod health;
pub mod logging;
