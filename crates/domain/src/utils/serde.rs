//! Serialization helpers for wire formats shared with the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::constants::FREE_SENTINEL;

/// Serialize `Option<DateTime<Utc>>` as an RFC 3339 string, or the `"-1"`
/// sentinel for `None`.
///
/// # Usage
/// ```rust
/// use chrono::{DateTime, Utc};
/// use roombook_domain::utils::serde::sentinel_timestamp;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(with = "sentinel_timestamp")]
///     next: Option<DateTime<Utc>>,
/// }
/// ```
pub mod sentinel_timestamp {
    use super::*;

    /// Serde serialization result type
    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Serialize the timestamp, writing the sentinel for `None`.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_str(FREE_SENTINEL),
        }
    }

    /// Deserialize either the sentinel or an RFC 3339 timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw == FREE_SENTINEL {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}
