use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roombook_core::CalendarGateway;
use roombook_domain::{
    AccessToken, Attendee, Building, CalendarEvent, DirectoryResource, NewEvent,
    Result as DomainResult, RoombookError,
};

/// What the scripted free/busy query answers for one id.
#[derive(Debug, Clone, Copy)]
pub enum FreeBusy {
    Free,
    BusyFrom(DateTime<Utc>),
    /// The id is left out of the response.
    Missing,
}

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FreeBusy { ids: Vec<String>, start: DateTime<Utc>, end: DateTime<Utc> },
    Create(NewEvent),
    Get(String),
    Update { id: String, end: DateTime<Utc>, attendees: Vec<Attendee> },
    Delete(String),
    ListUserEvents,
    ListRooms(Option<String>),
    GetRoom(String),
    ListBuildings,
}

#[derive(Default)]
struct Script {
    free_busy: HashMap<String, FreeBusy>,
    create_response: Option<CalendarEvent>,
    get_responses: VecDeque<DomainResult<CalendarEvent>>,
    last_get: Option<DomainResult<CalendarEvent>>,
    delete_error: Option<RoombookError>,
    /// 1-based index of the `update_end_time` call that fails, and its error.
    update_error: Option<(usize, RoombookError)>,
    user_events: Vec<CalendarEvent>,
    rooms: Vec<DirectoryResource>,
    buildings: Vec<Building>,
    calls: Vec<Call>,
}

/// In-memory `CalendarGateway` answering from a script and recording calls.
///
/// `get_event` pops scripted responses in order and keeps repeating the last
/// one once the queue is drained.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_free_busy(self, id: &str, answer: FreeBusy) -> Self {
        self.script.lock().unwrap().free_busy.insert(id.to_string(), answer);
        self
    }

    pub fn with_created_event(self, event: CalendarEvent) -> Self {
        self.script.lock().unwrap().create_response = Some(event);
        self
    }

    pub fn with_get_responses(self, responses: Vec<CalendarEvent>) -> Self {
        self.script.lock().unwrap().get_responses.extend(responses.into_iter().map(Ok));
        self
    }

    pub fn with_get_error(self, error: RoombookError) -> Self {
        self.script.lock().unwrap().get_responses.push_back(Err(error));
        self
    }

    pub fn with_delete_error(self, error: RoombookError) -> Self {
        self.script.lock().unwrap().delete_error = Some(error);
        self
    }

    /// Fail the `nth` end-time update (1-based) with `error`.
    pub fn with_update_error_on(self, nth: usize, error: RoombookError) -> Self {
        self.script.lock().unwrap().update_error = Some((nth, error));
        self
    }

    pub fn with_user_events(self, events: Vec<CalendarEvent>) -> Self {
        self.script.lock().unwrap().user_events = events;
        self
    }

    pub fn with_room(self, room: DirectoryResource) -> Self {
        self.script.lock().unwrap().rooms.push(room);
        self
    }

    pub fn with_building(self, building: Building) -> Self {
        self.script.lock().unwrap().buildings.push(building);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    pub fn get_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Get(_)))
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(String, DateTime<Utc>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update { id, end, .. } => Some((id, end)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl CalendarGateway for ScriptedGateway {
    async fn free_busy_query(
        &self,
        _token: &AccessToken,
        ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<HashMap<String, DateTime<Utc>>> {
        self.record(Call::FreeBusy { ids: ids.to_vec(), start, end });

        let script = self.script.lock().unwrap();
        let mut result = HashMap::new();
        for id in ids {
            match script.free_busy.get(id).copied().unwrap_or(FreeBusy::Free) {
                FreeBusy::Free => {
                    result.insert(id.clone(), end);
                }
                FreeBusy::BusyFrom(at) => {
                    result.insert(id.clone(), at);
                }
                FreeBusy::Missing => {}
            }
        }
        Ok(result)
    }

    async fn create_event(
        &self,
        _token: &AccessToken,
        event: &NewEvent,
    ) -> DomainResult<CalendarEvent> {
        self.record(Call::Create(event.clone()));

        let script = self.script.lock().unwrap();
        Ok(script.create_response.clone().unwrap_or_else(|| CalendarEvent {
            id: Some(super::EVENT_ID.to_string()),
            summary: Some(event.title.clone()),
            start: Some(event.start),
            end: Some(event.end),
            attendees: vec![
                Attendee::organizer(event.organizer_email.clone()),
                Attendee::room(event.room_id.clone()),
            ],
            organizer_email: Some(event.organizer_email.clone()),
        }))
    }

    async fn get_event(&self, _token: &AccessToken, event_id: &str) -> DomainResult<CalendarEvent> {
        self.record(Call::Get(event_id.to_string()));

        let mut script = self.script.lock().unwrap();
        if let Some(next) = script.get_responses.pop_front() {
            script.last_get = Some(next.clone());
            return next;
        }
        script
            .last_get
            .clone()
            .unwrap_or_else(|| Err(RoombookError::NotFound(format!("event {event_id}"))))
    }

    async fn update_end_time(
        &self,
        _token: &AccessToken,
        event_id: &str,
        new_end: DateTime<Utc>,
        attendees: &[Attendee],
    ) -> DomainResult<CalendarEvent> {
        self.record(Call::Update {
            id: event_id.to_string(),
            end: new_end,
            attendees: attendees.to_vec(),
        });

        let script = self.script.lock().unwrap();
        let update_number =
            script.calls.iter().filter(|call| matches!(call, Call::Update { .. })).count();
        if let Some((nth, err)) = &script.update_error {
            if *nth == update_number {
                return Err(err.clone());
            }
        }

        let mut event = match &script.last_get {
            Some(Ok(event)) => event.clone(),
            _ => CalendarEvent { id: Some(event_id.to_string()), ..CalendarEvent::default() },
        };
        event.end = Some(new_end);
        event.attendees = attendees.to_vec();
        Ok(event)
    }

    async fn delete_event(&self, _token: &AccessToken, event_id: &str) -> DomainResult<()> {
        self.record(Call::Delete(event_id.to_string()));

        match self.script.lock().unwrap().delete_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn list_user_events(
        &self,
        _token: &AccessToken,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.record(Call::ListUserEvents);
        Ok(self.script.lock().unwrap().user_events.clone())
    }

    async fn list_rooms(
        &self,
        _token: &AccessToken,
        building: Option<&str>,
    ) -> DomainResult<Vec<DirectoryResource>> {
        self.record(Call::ListRooms(building.map(str::to_string)));

        let script = self.script.lock().unwrap();
        Ok(script
            .rooms
            .iter()
            .filter(|room| building.is_none() || room.building_id.as_deref() == building)
            .cloned()
            .collect())
    }

    async fn get_room(&self, _token: &AccessToken, email: &str) -> DomainResult<DirectoryResource> {
        self.record(Call::GetRoom(email.to_string()));

        let script = self.script.lock().unwrap();
        script
            .rooms
            .iter()
            .find(|room| room.resource_email.as_deref() == Some(email))
            .cloned()
            .ok_or_else(|| RoombookError::NotFound(format!("room {email}")))
    }

    async fn list_buildings(&self, _token: &AccessToken) -> DomainResult<Vec<Building>> {
        self.record(Call::ListBuildings);
        Ok(self.script.lock().unwrap().buildings.clone())
    }
}
