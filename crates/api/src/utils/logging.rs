//! Structured logging helpers for request handlers

use std::time::Duration;

use roombook_domain::RoombookError;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,roombook_api=debug,roombook_core=debug";

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG`; `ROOMBOOK_LOG_FORMAT=json` switches to
/// JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("ROOMBOOK_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if let Err(err) = result {
        eprintln!("tracing subscriber already installed: {err}");
    }
}

/// Log the outcome of a handled request with structured fields.
///
/// `operation` should be a stable identifier such as `"booking::create"`.
#[inline]
pub fn log_request_outcome<T>(
    operation: &str,
    elapsed: Duration,
    result: &Result<T, RoombookError>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    match result {
        Ok(_) => info!(operation, duration_ms, "request_success"),
        Err(err) => warn!(
            operation,
            duration_ms,
            error_label = err.label(),
            status = err.status_code(),
            error = %err,
            "request_failure"
        ),
    }
}
