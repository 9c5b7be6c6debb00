//! Bounded, cancellable polling
//!
//! A fixed number of attempts with a fixed pause between them, stopping early
//! once a step reports a result or the cancellation token fires.

use std::future::Future;
use std::time::Duration;

use roombook_domain::constants::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};
use roombook_domain::{BookingConfig, Result};
use tokio_util::sync::CancellationToken;

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Upper bound on step calls.
    pub max_attempts: u32,
    /// Pause between two step calls.
    pub interval: Duration,
}

impl PollPolicy {
    /// Policy making at most `max_attempts` calls, `interval` apart.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self { max_attempts, interval }
    }

    /// Policy from the `booking` config section.
    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(config.poll_attempts, Duration::from_millis(config.poll_interval_ms))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_ATTEMPTS, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

/// Result of a single poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    /// The step has a result; polling stops.
    Done(T),
    /// Nothing yet; poll again after the interval.
    Pending,
}

/// How a polling run ended. `attempts` counts completed step calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// A step returned [`PollStep::Done`].
    Resolved { value: T, attempts: u32 },
    /// Every attempt came back pending.
    Exhausted { attempts: u32 },
    /// The token fired before a result.
    Cancelled { attempts: u32 },
}

impl<T> PollOutcome<T> {
    /// Step calls made, whatever the outcome.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Resolved { attempts, .. }
            | Self::Exhausted { attempts }
            | Self::Cancelled { attempts } => *attempts,
        }
    }
}

/// Call `step` until it returns [`PollStep::Done`], the attempts run out, or
/// `cancel` fires. The pause only happens between attempts. A step error
/// ends polling and is returned as is.
pub async fn poll_until<T, F, Fut>(
    policy: PollPolicy,
    cancel: &CancellationToken,
    mut step: F,
) -> Result<PollOutcome<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStep<T>>>,
{
    let mut attempts = 0;

    while attempts < policy.max_attempts {
        if cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled { attempts });
        }

        attempts += 1;
        if let PollStep::Done(value) = step(attempts).await? {
            return Ok(PollOutcome::Resolved { value, attempts });
        }

        if attempts < policy.max_attempts {
            tokio::select! {
                () = cancel.cancelled() => return Ok(PollOutcome::Cancelled { attempts }),
                () = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    Ok(PollOutcome::Exhausted { attempts })
}
