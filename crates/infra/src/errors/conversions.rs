//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use roombook_domain::RoombookError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RoombookError);

impl From<InfraError> for RoombookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RoombookError> for InfraError {
    fn from(value: RoombookError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRoombookError {
    fn into_roombook(self) -> RoombookError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for SqlError {
    fn into_roombook(self) -> RoombookError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        RoombookError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        RoombookError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        RoombookError::Database("unique constraint violation".into())
                    }
                    _ => RoombookError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => RoombookError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                RoombookError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                RoombookError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => RoombookError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => RoombookError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for PoolError {
    fn into_roombook(self) -> RoombookError {
        RoombookError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(RoombookError::Internal(format!("JSON error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for HttpError {
    fn into_roombook(self) -> RoombookError {
        if self.is_timeout() {
            return RoombookError::Upstream("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RoombookError::Upstream("HTTP connection failure".into());
        }

        if self.is_decode() {
            return RoombookError::Upstream(format!("malformed provider response: {self}"));
        }

        if let Some(status) = self.status() {
            let message = format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            return classify_provider_error(status, &message);
        }

        RoombookError::Upstream(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* Provider error classification */
/* -------------------------------------------------------------------------- */

const AUTH_MARKERS: [&str; 2] = ["Invalid Credentials", "invalid_grant"];
const NOT_FOUND_MARKERS: [&str; 2] = ["Resource has been deleted", "Not Found"];

/// Classify a failed provider call.
///
/// The provider's message wins when it carries a known marker; otherwise the
/// HTTP status decides.
pub fn classify_provider_error(status: StatusCode, message: &str) -> RoombookError {
    if AUTH_MARKERS.iter().any(|marker| message.contains(marker)) {
        return RoombookError::UpstreamAuth(message.to_string());
    }
    if NOT_FOUND_MARKERS.iter().any(|marker| message.contains(marker)) {
        return RoombookError::NotFound(message.to_string());
    }

    match status.as_u16() {
        401 | 403 => RoombookError::UpstreamAuth(message.to_string()),
        404 | 410 => RoombookError::NotFound(message.to_string()),
        409 => RoombookError::Conflict(message.to_string()),
        _ => RoombookError::Upstream(message.to_string()),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
