//! Configuration structures
//!
//! Loading lives in `roombook-infra` (`config::load`); these types only
//! describe the shape and the defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_ROOM_LOOKAHEAD_HOURS,
    DEFAULT_SESSION_TTL_SECS, EXTEND_TOLERANCE_SECS, FREE_BUSY_BATCH_SIZE,
};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string() }
    }
}

/// SQLite file and pool size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "roombook.db".to_string(), pool_size: 4 }
    }
}

/// Google OAuth client and API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Admin directory customer id; `my_customer` targets the caller's own.
    #[serde(default = "default_customer")]
    pub customer: String,
    #[serde(default = "default_calendar_api_base")]
    pub calendar_api_base: String,
    #[serde(default = "default_directory_api_base")]
    pub directory_api_base: String,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    /// Per-request timeout. Gateway calls are never retried.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:8080/auth/callback".to_string(),
            customer: default_customer(),
            calendar_api_base: default_calendar_api_base(),
            directory_api_base: default_directory_api_base(),
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_customer() -> String {
    "my_customer".to_string()
}

fn default_calendar_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_directory_api_base() -> String {
    "https://admin.googleapis.com/admin/directory/v1".to_string()
}

fn default_authorization_endpoint() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Booking orchestration tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Acceptance polls before giving up.
    pub poll_attempts: u32,
    /// Pause between acceptance polls.
    pub poll_interval_ms: u64,
    /// Slack allowed on free/busy when extending.
    pub extend_tolerance_secs: i64,
    /// Ids per free/busy request, clamped to the provider maximum.
    pub free_busy_batch_size: usize,
    /// Window for `nextCalendarEvent`.
    pub room_lookahead_hours: i64,
    /// Used when a create request does not say `noConfirmation` either way.
    pub no_confirmation_default: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            extend_tolerance_secs: EXTEND_TOLERANCE_SECS,
            free_busy_batch_size: FREE_BUSY_BATCH_SIZE,
            room_lookahead_hours: DEFAULT_ROOM_LOOKAHEAD_HOURS,
            no_confirmation_default: false,
        }
    }
}

/// Bearer session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on a session's lifetime.
    pub ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_seconds: DEFAULT_SESSION_TTL_SECS }
    }
}
