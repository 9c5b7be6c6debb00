//! # Roombook Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The Google Calendar / Admin Directory gateway
//! - SQLite user repository and connection pool
//! - OAuth login flow and the session cache
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `roombook-core`
//! - Contains all "impure" code (HTTP, database, environment)

pub mod auth;
pub mod calendar;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use auth::{OAuthClient, SessionStore};
pub use calendar::GoogleCalendarGateway;
pub use database::{DbManager, SqliteUserRepository};
pub use errors::InfraError;
pub use http::HttpClient;
