#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use roombook_domain::{AccessToken, GoogleConfig};
use roombook_infra::{GoogleCalendarGateway, HttpClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "ya29.test-token";
pub const ROOM_ID: &str = "kallio@resource.calendar.google.com";
pub const EVENT_ID: &str = "abcdefghijklmnopqrstuvwxyz";

pub fn token() -> AccessToken {
    AccessToken::new(TOKEN)
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, hour, minute, 0).unwrap()
}

/// Provider configuration pointing every endpoint at the mock server.
pub fn google_config(server: &MockServer) -> GoogleConfig {
    GoogleConfig {
        client_id: "client-123".into(),
        client_secret: "client-secret".into(),
        redirect_uri: "http://localhost:8080/auth/callback".into(),
        customer: "my_customer".into(),
        calendar_api_base: format!("{}/calendar/v3", server.uri()),
        directory_api_base: format!("{}/admin/directory/v1", server.uri()),
        authorization_endpoint: format!("{}/o/oauth2/v2/auth", server.uri()),
        token_endpoint: format!("{}/token", server.uri()),
        http_timeout_secs: 5,
    }
}

pub fn gateway(server: &MockServer) -> GoogleCalendarGateway {
    let config = google_config(server);
    GoogleCalendarGateway::new(HttpClient::from_config(&config).expect("http client"), config)
}

pub fn event_json(room_status: &str) -> Value {
    json!({
        "id": EVENT_ID,
        "summary": "Standup",
        "start": {"dateTime": "2024-05-02T09:00:00Z"},
        "end": {"dateTime": "2024-05-02T10:00:00Z"},
        "attendees": [
            {"email": ROOM_ID, "resource": true, "responseStatus": room_status},
            {"email": "alex@example.com", "responseStatus": "accepted", "organizer": true}
        ],
        "organizer": {"email": "alex@example.com"}
    })
}

pub fn room_json(email: &str, building: &str) -> Value {
    json!({
        "resourceEmail": email,
        "resourceName": "Kallio",
        "capacity": 8,
        "buildingId": building,
        "floorName": "3",
        "resourceCategory": "CONFERENCE_ROOM",
        "featureInstances": [{"feature": {"name": "Screen"}}]
    })
}

pub fn provider_error(code: u16, message: &str) -> Value {
    json!({"error": {"code": code, "message": message}})
}
