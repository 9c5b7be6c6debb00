//! User, preference and session types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::room::Building;

/// Per-user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Building the room list defaults to.
    pub building: Option<Building>,
}

/// User record keyed by the identity provider's stable subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Provider subject id.
    pub subject: String,
    pub email: String,
    pub preferences: Preferences,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

/// OAuth access token for the calendar provider.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Logged-in user as seen by request handlers.
#[derive(Debug, Clone)]
pub struct Session {
    pub subject: String,
    pub email: String,
    pub access_token: AccessToken,
    /// After this the session is rejected.
    pub expires_at: DateTime<Utc>,
}
