#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use roombook_api::{router, AppContext};
use roombook_core::{CalendarGateway, FixedClock};
use roombook_domain::{
    AccessToken, Attendee, Building, CalendarEvent, Config, DirectoryResource, GoogleConfig,
    NewEvent, ResponseStatus, Result as DomainResult, RoombookError,
};
use roombook_infra::{DbManager, HttpClient, OAuthClient, SqliteUserRepository};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ROOM_ID: &str = "kallio@resource.calendar.google.com";
pub const EVENT_ID: &str = "abcdefghijklmnopqrstuvwxyz";
pub const SUBJECT: &str = "108234";
pub const EMAIL: &str = "alex@example.com";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()
}

/// Gateway with a single room whose invitation answer is fixed per test.
pub struct RoomDesk {
    room_answer: ResponseStatus,
    event: Mutex<Option<CalendarEvent>>,
    calls: Mutex<Vec<&'static str>>,
}

impl RoomDesk {
    pub fn new(room_answer: ResponseStatus) -> Self {
        Self { room_answer, event: Mutex::new(None), calls: Mutex::new(Vec::new()) }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn current_event(&self) -> CalendarEvent {
        let mut event = self.event.lock().unwrap().clone().unwrap_or_else(|| {
            event(now(), now() + Duration::hours(1), ResponseStatus::NeedsAction)
        });
        if let Some(room) = event.attendees.iter_mut().find(|a| a.resource) {
            room.response_status = self.room_answer;
        }
        event
    }
}

pub fn event(start: DateTime<Utc>, end: DateTime<Utc>, room_status: ResponseStatus) -> CalendarEvent {
    let mut room = Attendee::room(ROOM_ID);
    room.response_status = room_status;
    CalendarEvent {
        id: Some(EVENT_ID.into()),
        summary: Some("Standup".into()),
        start: Some(start),
        end: Some(end),
        attendees: vec![room, Attendee::organizer(EMAIL)],
        organizer_email: Some(EMAIL.into()),
    }
}

pub fn room_resource() -> DirectoryResource {
    DirectoryResource {
        resource_email: Some(ROOM_ID.into()),
        resource_name: Some("Kallio".into()),
        capacity: Some(8),
        building_id: Some("HQ".into()),
        floor_name: Some("3".into()),
        ..DirectoryResource::default()
    }
}

#[async_trait]
impl CalendarGateway for RoomDesk {
    async fn free_busy_query(
        &self,
        _token: &AccessToken,
        ids: &[String],
        _start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<HashMap<String, DateTime<Utc>>> {
        self.record("free_busy");
        Ok(ids.iter().map(|id| (id.clone(), end)).collect())
    }

    async fn create_event(&self, _token: &AccessToken, new_event: &NewEvent) -> DomainResult<CalendarEvent> {
        self.record("create");
        let created = event(new_event.start, new_event.end, ResponseStatus::NeedsAction);
        *self.event.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn get_event(&self, _token: &AccessToken, event_id: &str) -> DomainResult<CalendarEvent> {
        self.record("get");
        if event_id != EVENT_ID {
            return Err(RoombookError::NotFound(format!("event {event_id}")));
        }
        Ok(self.current_event())
    }

    async fn update_end_time(
        &self,
        _token: &AccessToken,
        _event_id: &str,
        new_end: DateTime<Utc>,
        _attendees: &[Attendee],
    ) -> DomainResult<CalendarEvent> {
        self.record("update");
        let mut updated = self.current_event();
        updated.end = Some(new_end);
        *self.event.lock().unwrap() = Some(updated.clone());
        Ok(updated)
    }

    async fn delete_event(&self, _token: &AccessToken, _event_id: &str) -> DomainResult<()> {
        self.record("delete");
        Ok(())
    }

    async fn list_user_events(
        &self,
        _token: &AccessToken,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.record("list_user_events");
        Ok(vec![self.current_event()])
    }

    async fn list_rooms(
        &self,
        _token: &AccessToken,
        building: Option<&str>,
    ) -> DomainResult<Vec<DirectoryResource>> {
        self.record("list_rooms");
        let rooms = vec![room_resource()];
        Ok(rooms
            .into_iter()
            .filter(|room| building.map_or(true, |b| room.building_id.as_deref() == Some(b)))
            .collect())
    }

    async fn get_room(&self, _token: &AccessToken, email: &str) -> DomainResult<DirectoryResource> {
        self.record("get_room");
        if email == ROOM_ID {
            Ok(room_resource())
        } else {
            Err(RoombookError::NotFound(format!("room {email}")))
        }
    }

    async fn list_buildings(&self, _token: &AccessToken) -> DomainResult<Vec<Building>> {
        self.record("list_buildings");
        Ok(vec![Building { id: "HQ".into(), name: "Headquarters".into() }])
    }
}

/// Application wired to a [`RoomDesk`], a temporary database and a fixed
/// clock.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub gateway: Arc<RoomDesk>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new(room_answer: ResponseStatus) -> Self {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db = Arc::new(DbManager::new(temp_dir.path().join("roombook.db"), 2).expect("db"));
        db.run_migrations().expect("migrations");

        let gateway = Arc::new(RoomDesk::new(room_answer));
        let users = Arc::new(SqliteUserRepository::new(db.clone()));
        let config = Config { google: GoogleConfig::default(), ..Config::default() };
        let oauth = OAuthClient::new(HttpClient::builder().build().expect("http"), config.google.clone());

        let ctx = AppContext::from_parts(
            config,
            db,
            gateway.clone(),
            users,
            Arc::new(FixedClock::new(now())),
            oauth,
        );

        Self { ctx: Arc::new(ctx), gateway, _temp_dir: temp_dir }
    }

    pub fn router(&self) -> Router {
        router(self.ctx.clone())
    }

    /// Register the test user and open a session for them.
    pub async fn login(&self) -> String {
        self.ctx.preferences.register_login(SUBJECT, EMAIL).await.expect("register login");
        let (token, _) = self
            .ctx
            .sessions
            .issue(SUBJECT.into(), EMAIL.into(), AccessToken::new("ya29.test"), Some(3600))
            .await;
        token
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
        (status, body)
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
