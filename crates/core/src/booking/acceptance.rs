//! Waiting for a room to answer its invitation

use roombook_domain::{AccessToken, ResponseStatus, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::poll::{poll_until, PollOutcome, PollPolicy, PollStep};
use super::simplify::find_room_attendee;
use crate::calendar_ports::CalendarGateway;

/// Why a room counts as not having accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The room is no longer on the attendee list.
    RoomRemoved,
    /// The room answered with something other than `accepted`.
    Responded(ResponseStatus),
    /// Still `needsAction` after the last attempt.
    NoAnswer,
    /// Polling was cancelled before the room answered.
    Cancelled,
}

/// Final answer of the acceptance poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomAcceptance {
    /// Whether the room accepted within the poll budget.
    pub accepted: bool,
    /// Why not, when `accepted` is false.
    pub decline_reason: Option<DeclineReason>,
    /// Number of `get_event` calls made.
    pub polls: u32,
}

impl RoomAcceptance {
    fn declined(reason: DeclineReason, polls: u32) -> Self {
        Self { accepted: false, decline_reason: Some(reason), polls }
    }
}

/// Poll `event_id` until the room attendee leaves `needsAction`.
///
/// A missing room attendee ends polling at once and counts as a decline, as
/// does running out of attempts or being cancelled.
pub async fn await_room_acceptance(
    gateway: &dyn CalendarGateway,
    token: &AccessToken,
    event_id: &str,
    room_id: &str,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<RoomAcceptance> {
    let outcome = poll_until(policy, cancel, |attempt| {
        room_status(gateway, token, event_id, room_id, attempt)
    })
    .await?;

    let acceptance = match outcome {
        PollOutcome::Resolved { value: Some(ResponseStatus::Accepted), attempts } => {
            RoomAcceptance { accepted: true, decline_reason: None, polls: attempts }
        }
        PollOutcome::Resolved { value: Some(status), attempts } => {
            RoomAcceptance::declined(DeclineReason::Responded(status), attempts)
        }
        PollOutcome::Resolved { value: None, attempts } => {
            RoomAcceptance::declined(DeclineReason::RoomRemoved, attempts)
        }
        PollOutcome::Exhausted { attempts } => {
            RoomAcceptance::declined(DeclineReason::NoAnswer, attempts)
        }
        PollOutcome::Cancelled { attempts } => {
            warn!(event_id, attempts, "acceptance polling cancelled");
            RoomAcceptance::declined(DeclineReason::Cancelled, attempts)
        }
    };

    Ok(acceptance)
}

/// One poll: `Done(None)` when the room is gone, `Done(Some(status))` once it
/// answered.
async fn room_status(
    gateway: &dyn CalendarGateway,
    token: &AccessToken,
    event_id: &str,
    room_id: &str,
    attempt: u32,
) -> Result<PollStep<Option<ResponseStatus>>> {
    let event = gateway.get_event(token, event_id).await?;

    let Some(attendee) = find_room_attendee(&event, room_id) else {
        debug!(event_id, attempt, "room attendee missing from event");
        return Ok(PollStep::Done(None));
    };

    if attendee.response_status.is_settled() {
        return Ok(PollStep::Done(Some(attendee.response_status)));
    }

    debug!(event_id, attempt, "room has not answered yet");
    Ok(PollStep::Pending)
}
