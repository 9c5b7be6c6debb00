//! Google gateway against a mocked provider

mod support;

use roombook_core::CalendarGateway;
use roombook_domain::{Attendee, NewEvent, ResponseStatus, RoombookError};
use serde_json::json;
use support::*;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn free_busy_reports_end_or_first_busy_start() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/freeBusy"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({"items": [{"id": "free@r"}, {"id": "busy@r"}, {"id": "gone@r"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendars": {
                "free@r": {"busy": []},
                "busy@r": {"busy": [
                    {"start": "2024-05-02T09:45:00Z", "end": "2024-05-02T11:00:00Z"},
                    {"start": "2024-05-02T09:30:00Z", "end": "2024-05-02T09:40:00Z"}
                ]},
                "gone@r": {"errors": [{"domain": "global", "reason": "notFound"}]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["free@r".to_string(), "busy@r".to_string(), "gone@r".to_string()];
    let result = gateway(&server).free_busy_query(&token(), &ids, at(9, 0), at(10, 0)).await.unwrap();

    assert_eq!(result.get("free@r"), Some(&at(10, 0)));
    assert_eq!(result.get("busy@r"), Some(&at(9, 30)));
    assert!(!result.contains_key("gone@r"));
}

#[tokio::test]
async fn create_event_invites_room_and_accepted_organizer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(query_param("sendUpdates", "all"))
        .and(body_partial_json(json!({
            "summary": "Standup",
            "start": {"dateTime": "2024-05-02T09:00:00Z"},
            "attendees": [
                {"email": ROOM_ID, "resource": true, "responseStatus": "needsAction"},
                {"email": "alex@example.com", "responseStatus": "accepted"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("needsAction")))
        .expect(1)
        .mount(&server)
        .await;

    let new_event = NewEvent {
        room_id: ROOM_ID.into(),
        organizer_email: "alex@example.com".into(),
        title: "Standup".into(),
        start: at(9, 0),
        end: at(10, 0),
    };
    let created = gateway(&server).create_event(&token(), &new_event).await.unwrap();

    assert_eq!(created.id.as_deref(), Some(EVENT_ID));
    assert_eq!(created.resource_attendee().map(|a| a.response_status), Some(ResponseStatus::NeedsAction));
}

#[tokio::test]
async fn get_event_maps_deleted_event_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/calendar/v3/calendars/primary/events/{EVENT_ID}")))
        .respond_with(ResponseTemplate::new(410).set_body_json(provider_error(410, "Resource has been deleted")))
        .mount(&server)
        .await;

    let result = gateway(&server).get_event(&token(), EVENT_ID).await;
    assert!(matches!(result, Err(RoombookError::NotFound(_))), "{result:?}");
}

#[tokio::test]
async fn get_event_maps_malformed_id_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events/bogus"))
        .respond_with(ResponseTemplate::new(400).set_body_json(provider_error(400, "Invalid resource id value.")))
        .mount(&server)
        .await;

    let result = gateway(&server).get_event(&token(), "bogus").await;
    assert!(matches!(result, Err(RoombookError::NotFound(_))), "{result:?}");
}

#[tokio::test]
async fn event_id_stays_a_single_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events/abc%2Fdef%3Fghi%23jkl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("accepted")))
        .expect(1)
        .mount(&server)
        .await;

    let event = gateway(&server).get_event(&token(), "abc/def?ghi#jkl").await.unwrap();
    assert_eq!(event.id.as_deref(), Some(EVENT_ID));
}

#[tokio::test]
async fn rejected_credentials_are_upstream_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(provider_error(401, "Invalid Credentials")))
        .mount(&server)
        .await;

    let result = gateway(&server).get_event(&token(), EVENT_ID).await;
    assert!(matches!(result, Err(RoombookError::UpstreamAuth(_))), "{result:?}");
}

#[tokio::test]
async fn update_end_time_patches_end_and_attendees() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/calendar/v3/calendars/primary/events/{EVENT_ID}")))
        .and(body_partial_json(json!({
            "end": {"dateTime": "2024-05-02T10:30:00Z"},
            "attendees": [{"email": ROOM_ID, "resource": true, "responseStatus": "needsAction"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("needsAction")))
        .expect(1)
        .mount(&server)
        .await;

    let attendees = vec![Attendee::room(ROOM_ID)];
    gateway(&server).update_end_time(&token(), EVENT_ID, at(10, 30), &attendees).await.unwrap();
}

#[tokio::test]
async fn deleting_a_gone_event_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/calendar/v3/calendars/primary/events/{EVENT_ID}")))
        .respond_with(ResponseTemplate::new(410).set_body_json(provider_error(410, "Resource has been deleted")))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).delete_event(&token(), EVENT_ID).await.unwrap();
}

#[tokio::test]
async fn delete_propagates_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let result = gateway(&server).delete_event(&token(), EVENT_ID).await;
    assert!(matches!(result, Err(RoombookError::Upstream(_))), "{result:?}");
}

#[tokio::test]
async fn list_user_events_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [event_json("accepted")]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(query_param("singleEvents", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [event_json("needsAction")], "nextPageToken": "page-2"})),
        )
        .mount(&server)
        .await;

    let events = gateway(&server).list_user_events(&token(), at(9, 0), at(9, 1)).await.unwrap();
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn list_rooms_filters_building_and_category() {
    let server = MockServer::start().await;
    let mut equipment = room_json("beamer@r", "HQ");
    equipment["resourceCategory"] = json!("OTHER");
    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/customer/my_customer/resources/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [room_json("a@r", "HQ"), room_json("b@r", "Annex"), equipment]
        })))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    let all = gateway.list_rooms(&token(), None).await.unwrap();
    let hq = gateway.list_rooms(&token(), Some("HQ")).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(hq.len(), 1);
    assert_eq!(hq[0].resource_email.as_deref(), Some("a@r"));
}

#[tokio::test]
async fn get_room_queries_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/customer/my_customer/resources/calendars"))
        .and(query_param("query", format!("resourceEmail=\"{ROOM_ID}\"").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [room_json(ROOM_ID, "HQ")]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/customer/my_customer/resources/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    let room = gateway.get_room(&token(), ROOM_ID).await.unwrap();
    assert_eq!(room.capacity, Some(8));

    let missing = gateway.get_room(&token(), "nobody@r").await;
    assert!(matches!(missing, Err(RoombookError::NotFound(_))), "{missing:?}");
}

#[tokio::test]
async fn list_buildings_falls_back_to_id_for_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/customer/my_customer/resources/buildings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "buildings": [
                {"buildingId": "HQ", "buildingName": "Headquarters"},
                {"buildingId": "Annex"}
            ]
        })))
        .mount(&server)
        .await;

    let buildings = gateway(&server).list_buildings(&token()).await.unwrap();
    assert_eq!(buildings[0].name, "Headquarters");
    assert_eq!(buildings[1].name, "Annex");
}
