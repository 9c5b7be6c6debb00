//! Booking orchestration - create, extend, fetch, cancel
//!
//! Creating a booking runs through
//! `Validating → CheckingAvailability → Creating → PollingAcceptance →
//! {Confirmed | RollingBack}`. Each step takes the [`BookingContext`] by value
//! and hands back the next one, so nothing is shared between steps except
//! what the context carries.
//!
//! Rolling back is a compensating delete with no durable record in between:
//! if the process dies after the create and before the decision, the
//! unconfirmed event stays in the calendar.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use roombook_domain::{
    AccessToken, Attendee, Booking, BookingConfig, CalendarEvent, NewEvent, ResponseStatus,
    Result, Room, RoombookError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::acceptance::{await_room_acceptance, RoomAcceptance};
use super::poll::PollPolicy;
use super::simplify::{
    acceptance_from_status, filter_currently_running, find_resource_attendee, simplify_event,
    simplify_room,
};
use super::validation::{check_minutes, validate_booking_id, BookingInput};
use crate::calendar_ports::CalendarGateway;
use crate::clock::Clock;
use crate::rooms::availability::{is_free, is_free_within};

/// Where a create-booking flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    /// Input checked, nothing sent yet.
    Validating,
    /// Asking free/busy whether the slot is open.
    CheckingAvailability,
    /// Inserting the event with the room invited.
    Creating,
    /// Waiting for the room's answer.
    PollingAcceptance,
    /// Room accepted, or no answer was asked for.
    Confirmed,
    /// Room declined or never answered; the event is being deleted.
    RollingBack,
}

/// Everything the create-booking steps accumulate.
#[derive(Debug, Clone)]
pub struct BookingContext {
    /// Current step.
    pub stage: BookingStage,
    /// The validated request.
    pub input: BookingInput,
    /// Who the event is created for.
    pub organizer_email: String,
    /// Skip the acceptance poll.
    pub no_confirmation: bool,
    /// Booking start, the time the request was handled.
    pub start: DateTime<Utc>,
    /// `start` plus the requested duration.
    pub end: DateTime<Utc>,
    /// The event as the provider returned it on insert.
    pub event: Option<CalendarEvent>,
    /// Provider id of the inserted event.
    pub event_id: Option<String>,
    /// The room's answer; `None` until polled or when polling is skipped.
    pub room_accepted: Option<bool>,
}

impl BookingContext {
    fn new(
        input: BookingInput,
        organizer_email: &str,
        no_confirmation: bool,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let end = add_minutes(now, "duration", input.duration_minutes)?;
        Ok(Self {
            stage: BookingStage::Validating,
            input,
            organizer_email: organizer_email.to_string(),
            no_confirmation,
            start: now,
            end,
            event: None,
            event_id: None,
            room_accepted: None,
        })
    }

    fn advance(mut self, stage: BookingStage) -> Self {
        debug!(from = ?self.stage, to = ?stage, room_id = %self.input.room_id, "booking stage");
        self.stage = stage;
        self
    }

    fn require_event_id(&self) -> Result<&str> {
        self.event_id
            .as_deref()
            .ok_or_else(|| RoombookError::Internal("booking context has no event id".into()))
    }
}

/// Booking orchestrator over a [`CalendarGateway`].
pub struct BookingService {
    gateway: Arc<dyn CalendarGateway>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl BookingService {
    /// Service issuing calls through `gateway`, with time from `clock`.
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self { gateway, clock, config }
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_config(&self.config)
    }

    /// Reserve `input.room_id` from now for `input.duration_minutes`.
    ///
    /// With `no_confirmation` the room's answer is not awaited and the
    /// returned booking has `room_accepted = None`. Otherwise a decline (or
    /// no answer in time, or `cancel` firing) deletes the event again and
    /// yields `Conflict`.
    pub async fn create_booking(
        &self,
        token: &AccessToken,
        organizer_email: &str,
        input: BookingInput,
        no_confirmation: bool,
        cancel: &CancellationToken,
    ) -> Result<Booking> {
        let ctx = BookingContext::new(input, organizer_email, no_confirmation, self.clock.now())?;

        let ctx = self.check_availability(token, ctx).await?;
        let ctx = self.create_event(token, ctx).await?;
        let ctx = self.poll_acceptance(token, ctx, cancel).await?;

        if ctx.room_accepted == Some(false) {
            return Err(self.roll_back(token, ctx).await);
        }
        self.confirm(token, ctx).await
    }

    async fn check_availability(
        &self,
        token: &AccessToken,
        ctx: BookingContext,
    ) -> Result<BookingContext> {
        let ctx = ctx.advance(BookingStage::CheckingAvailability);
        let room_id = ctx.input.room_id.as_str();

        let free_busy = self
            .gateway
            .free_busy_query(token, &[room_id.to_string()], ctx.start, ctx.end)
            .await?;

        let next_busy = free_busy.get(room_id).copied().ok_or_else(|| {
            RoombookError::Upstream(format!("free/busy returned no entry for {room_id}"))
        })?;

        if !is_free(next_busy, ctx.end) {
            info!(room_id, busy_from = %next_busy, "room is not free for the requested slot");
            return Err(RoombookError::Conflict(format!(
                "room {room_id} is busy from {}",
                next_busy.to_rfc3339()
            )));
        }

        Ok(ctx.advance(BookingStage::Creating))
    }

    async fn create_event(
        &self,
        token: &AccessToken,
        mut ctx: BookingContext,
    ) -> Result<BookingContext> {
        let new_event = NewEvent {
            room_id: ctx.input.room_id.clone(),
            organizer_email: ctx.organizer_email.clone(),
            title: ctx.input.title.clone(),
            start: ctx.start,
            end: ctx.end,
        };

        let event = self.gateway.create_event(token, &new_event).await?;

        // A create that hands back no id cannot be followed up; retrying could
        // double-book, so this is final.
        let event_id = event
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RoombookError::Upstream("created event has no id".into()))?;

        info!(event_id = %event_id, room_id = %ctx.input.room_id, "booking event created");
        ctx.event_id = Some(event_id);
        ctx.event = Some(event);
        Ok(ctx.advance(BookingStage::PollingAcceptance))
    }

    async fn poll_acceptance(
        &self,
        token: &AccessToken,
        mut ctx: BookingContext,
        cancel: &CancellationToken,
    ) -> Result<BookingContext> {
        if ctx.no_confirmation {
            return Ok(ctx.advance(BookingStage::Confirmed));
        }

        let acceptance = await_room_acceptance(
            self.gateway.as_ref(),
            token,
            ctx.require_event_id()?,
            &ctx.input.room_id,
            self.poll_policy(),
            cancel,
        )
        .await?;
        log_acceptance(ctx.event_id.as_deref(), &acceptance);

        ctx.room_accepted = Some(acceptance.accepted);
        let next =
            if acceptance.accepted { BookingStage::Confirmed } else { BookingStage::RollingBack };
        Ok(ctx.advance(next))
    }

    /// Delete the unaccepted event. Returns the error to surface: `Conflict`
    /// once the delete went through, the delete's own error otherwise.
    async fn roll_back(&self, token: &AccessToken, ctx: BookingContext) -> RoombookError {
        let event_id = match ctx.require_event_id() {
            Ok(id) => id,
            Err(err) => return err,
        };

        if let Err(err) = self.gateway.delete_event(token, event_id).await {
            warn!(event_id, error = %err, "rollback delete failed; event left in calendar");
            return err;
        }

        info!(event_id, room_id = %ctx.input.room_id, "room declined, booking rolled back");
        RoombookError::Conflict(format!("room {} declined the booking", ctx.input.room_id))
    }

    async fn confirm(&self, token: &AccessToken, ctx: BookingContext) -> Result<Booking> {
        let event = ctx
            .event
            .as_ref()
            .ok_or_else(|| RoombookError::Internal("booking context has no event".into()))?;
        let room = self.lookup_room(token, &ctx.input.room_id).await?;

        let mut booking = simplify_event(event, Some(room))?;
        booking.room_accepted = ctx.room_accepted;
        Ok(booking)
    }

    /// Extend booking `booking_id` by `minutes`.
    ///
    /// The room has to accept the new end time; on a decline the original end
    /// time and attendee states are written back and `Conflict` is returned.
    pub async fn add_time(
        &self,
        token: &AccessToken,
        booking_id: &str,
        minutes: i64,
        cancel: &CancellationToken,
    ) -> Result<Booking> {
        validate_booking_id(booking_id)?;
        check_minutes("timeToAdd", minutes)?;

        let event = self.gateway.get_event(token, booking_id).await?;
        let room_attendee = find_resource_attendee(&event).cloned().ok_or_else(|| {
            RoombookError::Integrity(format!("booking {booking_id} has no room attendee"))
        })?;
        let current_end = event.end.ok_or_else(|| {
            RoombookError::Integrity(format!("booking {booking_id} has no end time"))
        })?;
        let new_end = add_minutes(current_end, "timeToAdd", minutes)?;
        let room_id = room_attendee.email.as_str();

        let free_busy = self
            .gateway
            .free_busy_query(token, &[room_id.to_string()], current_end, new_end)
            .await?;
        let next_busy = free_busy.get(room_id).copied().ok_or_else(|| {
            RoombookError::Upstream(format!("free/busy returned no entry for {room_id}"))
        })?;
        let tolerance = Duration::seconds(self.config.extend_tolerance_secs);
        if !is_free_within(next_busy, new_end, tolerance) {
            info!(booking_id, room_id, busy_from = %next_busy, "room is not free for the extension");
            return Err(RoombookError::Conflict(format!(
                "room {room_id} is busy from {}",
                next_busy.to_rfc3339()
            )));
        }

        let pending_attendees = reset_room_response(&event.attendees, room_id);
        let updated =
            self.gateway.update_end_time(token, booking_id, new_end, &pending_attendees).await?;

        let acceptance = await_room_acceptance(
            self.gateway.as_ref(),
            token,
            booking_id,
            room_id,
            self.poll_policy(),
            cancel,
        )
        .await?;
        log_acceptance(Some(booking_id), &acceptance);

        if !acceptance.accepted {
            self.gateway
                .update_end_time(token, booking_id, current_end, &event.attendees)
                .await?;
            info!(booking_id, room_id, "room declined the extension, end time reverted");
            return Err(RoombookError::Conflict(format!(
                "room {room_id} declined the extended booking"
            )));
        }

        let room = self.lookup_room(token, room_id).await?;
        let mut booking = simplify_event(&updated, Some(room))?;
        booking.room_accepted = Some(true);
        Ok(booking)
    }

    /// Fetch a single booking.
    pub async fn get_booking(&self, token: &AccessToken, booking_id: &str) -> Result<Booking> {
        validate_booking_id(booking_id)?;

        let event = self.gateway.get_event(token, booking_id).await?;
        let Some(room_attendee) = find_resource_attendee(&event) else {
            return simplify_event(&event, None);
        };

        let room = self.lookup_room(token, &room_attendee.email).await?;
        let mut booking = simplify_event(&event, Some(room))?;
        booking.room_accepted = acceptance_from_status(room_attendee.response_status);
        Ok(booking)
    }

    /// Cancel a booking. One that is already gone counts as cancelled.
    pub async fn delete_booking(&self, token: &AccessToken, booking_id: &str) -> Result<()> {
        validate_booking_id(booking_id)?;

        match self.gateway.delete_event(token, booking_id).await {
            Ok(()) => {
                info!(booking_id, "booking deleted");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(booking_id, "booking already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// The caller's bookings running right now.
    ///
    /// Events without a room, or whose room is no longer in the directory,
    /// are skipped.
    pub async fn current_bookings(&self, token: &AccessToken) -> Result<Vec<Booking>> {
        let now = self.clock.now();
        let events = self.gateway.list_user_events(token, now, now + Duration::seconds(1)).await?;

        let mut bookings = Vec::with_capacity(events.len());
        for event in &events {
            let Some(room_attendee) = find_resource_attendee(event) else {
                continue;
            };

            let room = match self.lookup_room(token, &room_attendee.email).await {
                Ok(room) => room,
                Err(err) if err.is_not_found() => {
                    debug!(room_id = %room_attendee.email, "room not in directory, skipping");
                    continue;
                }
                Err(err) => return Err(err),
            };

            match simplify_event(event, Some(room)) {
                Ok(mut booking) => {
                    booking.room_accepted = acceptance_from_status(room_attendee.response_status);
                    bookings.push(booking);
                }
                Err(err) => warn!(event_id = ?event.id, error = %err, "skipping malformed event"),
            }
        }

        Ok(filter_currently_running(bookings, now))
    }

    async fn lookup_room(&self, token: &AccessToken, room_id: &str) -> Result<Room> {
        let resource = self.gateway.get_room(token, room_id).await?;
        Ok(simplify_room(&resource))
    }
}

/// `at + minutes`, with the range checked and the addition checked against
/// chrono's limits.
fn add_minutes(at: DateTime<Utc>, field: &str, minutes: i64) -> Result<DateTime<Utc>> {
    check_minutes(field, minutes)?;
    Duration::try_minutes(minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| RoombookError::Validation(format!("{field} is out of range")))
}

/// Copy of `attendees` with the room set back to `needsAction`, so the poll
/// waits for the room's answer to the change.
fn reset_room_response(attendees: &[Attendee], room_id: &str) -> Vec<Attendee> {
    attendees
        .iter()
        .map(|attendee| {
            let mut attendee = attendee.clone();
            if attendee.email.eq_ignore_ascii_case(room_id) {
                attendee.response_status = ResponseStatus::NeedsAction;
            }
            attendee
        })
        .collect()
}

fn log_acceptance(event_id: Option<&str>, acceptance: &RoomAcceptance) {
    if acceptance.accepted {
        info!(event_id, polls = acceptance.polls, "room accepted");
    } else {
        info!(
            event_id,
            polls = acceptance.polls,
            reason = ?acceptance.decline_reason,
            "room did not accept"
        );
    }
}
