//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Roombook
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RoombookError {
    /// Missing or malformed caller input. Raised before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Room unavailable for the requested window or declined the invitation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The calendar provider rejected our credentials.
    #[error("Upstream authentication error: {0}")]
    UpstreamAuth(String),

    /// Uncategorized calendar provider failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A provider record is missing a field the booking model requires.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// No session, or the session expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RoombookError {
    /// HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UpstreamAuth(_) | Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Upstream(_)
            | Self::Integrity(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Stable label suitable for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::UpstreamAuth(_) => "upstream_auth",
            Self::Upstream(_) => "upstream",
            Self::Integrity(_) => "integrity",
            Self::Unauthorized(_) => "unauthorized",
            Self::Config(_) => "config",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }

    /// The human-readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::UpstreamAuth(msg)
            | Self::Upstream(msg)
            | Self::Integrity(msg)
            | Self::Unauthorized(msg)
            | Self::Config(msg)
            | Self::Database(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Whether this is the provider's "resource is gone" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for Roombook operations
pub type Result<T> = std::result::Result<T, RoombookError>;
