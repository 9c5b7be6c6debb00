//! Google Calendar and Admin Directory gateway

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use roombook_core::CalendarGateway;
use roombook_domain::{
    AccessToken, Attendee, Building, CalendarEvent, DirectoryResource, GoogleConfig, NewEvent,
    Result, RoombookError,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::types::{
    BuildingList, ErrorEnvelope, EventDateTime, EventInsert, EventList, EventPatch,
    FreeBusyItem, FreeBusyRequest, FreeBusyResponse, GoogleAttendee, GoogleEvent, ResourceList,
};
use crate::errors::{classify_provider_error, InfraError};
use crate::http::HttpClient;

const PRIMARY_EVENTS: &str = "calendars/primary/events";
const CONFERENCE_ROOM: &str = "CONFERENCE_ROOM";
const DIRECTORY_PAGE_SIZE: &str = "500";

/// [`CalendarGateway`] backed by the Google Calendar v3 and Admin Directory
/// v1 REST APIs. Every call runs with the end user's own access token.
pub struct GoogleCalendarGateway {
    http: HttpClient,
    config: GoogleConfig,
}

impl GoogleCalendarGateway {
    /// Gateway sending through `http` to the API bases in `config`.
    pub fn new(http: HttpClient, config: GoogleConfig) -> Self {
        Self { http, config }
    }

    /// Gateway with its own client built from `config`.
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?, config.clone()))
    }

    fn calendar_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.calendar_api_base.trim_end_matches('/'), path)
    }

    fn directory_url(&self, path: &str) -> String {
        format!(
            "{}/customer/{}/{}",
            self.config.directory_api_base.trim_end_matches('/'),
            self.config.customer,
            path
        )
    }

    /// URL of one event. The id goes in as a single percent-encoded path
    /// segment, so `/`, `?` or `#` in it cannot reach another endpoint.
    fn event_url(&self, event_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.calendar_url(PRIMARY_EVENTS))
            .map_err(|err| RoombookError::Config(format!("invalid calendar API base: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| RoombookError::Config("calendar API base cannot hold a path".into()))?
            .push(event_id);
        Ok(url)
    }

    async fn execute(&self, token: &AccessToken, builder: RequestBuilder) -> Result<Response> {
        let response = self.http.send(builder.bearer_auth(token.secret())).await?;
        ensure_success(response).await
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(token, builder).await?;
        read_json(response).await
    }

    /// Walk every page of the directory's calendar resources.
    async fn directory_resources(
        &self,
        token: &AccessToken,
        query: Option<&str>,
    ) -> Result<Vec<DirectoryResource>> {
        let url = self.directory_url("resources/calendars");
        let mut resources = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .http
                .request(Method::GET, &url)
                .query(&[("maxResults", DIRECTORY_PAGE_SIZE)]);
            if let Some(query) = query {
                builder = builder.query(&[("query", query)]);
            }
            if let Some(page) = page_token.as_deref() {
                builder = builder.query(&[("pageToken", page)]);
            }

            let page: ResourceList = self.execute_json(token, builder).await?;
            resources.extend(page.items);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(resources)
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    async fn free_busy_query(
        &self,
        token: &AccessToken,
        ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, DateTime<Utc>>> {
        let body = FreeBusyRequest {
            time_min: start,
            time_max: end,
            items: ids.iter().map(|id| FreeBusyItem { id: id.as_str() }).collect(),
        };
        let builder = self.http.request(Method::POST, self.calendar_url("freeBusy")).json(&body);
        let response: FreeBusyResponse = self.execute_json(token, builder).await?;

        let mut result = HashMap::with_capacity(response.calendars.len());
        for (id, calendar) in response.calendars {
            if let Some(error) = calendar.errors.first() {
                debug!(calendar = %id, reason = ?error.reason, "free/busy lookup failed for calendar");
                continue;
            }
            result.insert(id, calendar.next_busy_or(end));
        }
        Ok(result)
    }

    async fn create_event(&self, token: &AccessToken, event: &NewEvent) -> Result<CalendarEvent> {
        let body = EventInsert {
            summary: &event.title,
            start: EventDateTime::at(event.start),
            end: EventDateTime::at(event.end),
            attendees: vec![
                GoogleAttendee::from(&Attendee::room(&event.room_id)),
                GoogleAttendee::from(&Attendee::organizer(&event.organizer_email)),
            ],
        };
        let builder = self
            .http
            .request(Method::POST, self.calendar_url(PRIMARY_EVENTS))
            .query(&[("sendUpdates", "all")])
            .json(&body);

        let created: GoogleEvent = self.execute_json(token, builder).await?;
        Ok(created.into())
    }

    async fn get_event(&self, token: &AccessToken, event_id: &str) -> Result<CalendarEvent> {
        let builder = self.http.request(Method::GET, self.event_url(event_id)?);
        match self.execute_json::<GoogleEvent>(token, builder).await {
            Ok(event) => Ok(event.into()),
            // The provider rejects malformed ids with 400; to callers that is
            // simply an event that does not exist.
            Err(RoombookError::Upstream(message)) if message.contains("Invalid resource id") => {
                Err(RoombookError::NotFound(message))
            }
            Err(err) => Err(err),
        }
    }

    async fn update_end_time(
        &self,
        token: &AccessToken,
        event_id: &str,
        new_end: DateTime<Utc>,
        attendees: &[Attendee],
    ) -> Result<CalendarEvent> {
        let body = EventPatch {
            end: EventDateTime::at(new_end),
            attendees: attendees.iter().map(GoogleAttendee::from).collect(),
        };
        let builder = self
            .http
            .request(Method::PATCH, self.event_url(event_id)?)
            .query(&[("sendUpdates", "all")])
            .json(&body);

        let updated: GoogleEvent = self.execute_json(token, builder).await?;
        Ok(updated.into())
    }

    async fn delete_event(&self, token: &AccessToken, event_id: &str) -> Result<()> {
        let builder = self
            .http
            .request(Method::DELETE, self.event_url(event_id)?)
            .query(&[("sendUpdates", "all")]);

        match self.execute(token, builder).await {
            Ok(_) => Ok(()),
            Err(RoombookError::NotFound(message)) => {
                debug!(event_id, %message, "event already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn list_user_events(
        &self,
        token: &AccessToken,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let url = self.calendar_url(PRIMARY_EVENTS);
        let time_min = start.to_rfc3339();
        let time_max = end.to_rfc3339();
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self.http.request(Method::GET, &url).query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ]);
            if let Some(page) = page_token.as_deref() {
                builder = builder.query(&[("pageToken", page)]);
            }

            let page: EventList = self.execute_json(token, builder).await?;
            events.extend(page.items.into_iter().map(CalendarEvent::from));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(events)
    }

    async fn list_rooms(
        &self,
        token: &AccessToken,
        building: Option<&str>,
    ) -> Result<Vec<DirectoryResource>> {
        let resources = self.directory_resources(token, None).await?;
        Ok(resources
            .into_iter()
            .filter(|resource| {
                resource.resource_category.as_deref().map_or(true, |c| c == CONFERENCE_ROOM)
            })
            .filter(|resource| {
                building.map_or(true, |wanted| resource.building_id.as_deref() == Some(wanted))
            })
            .collect())
    }

    async fn get_room(&self, token: &AccessToken, email: &str) -> Result<DirectoryResource> {
        let query = format!("resourceEmail=\"{email}\"");
        let resources = self.directory_resources(token, Some(&query)).await?;

        resources
            .into_iter()
            .find(|resource| {
                resource
                    .resource_email
                    .as_deref()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(email))
            })
            .ok_or_else(|| RoombookError::NotFound(format!("room {email} not found")))
    }

    async fn list_buildings(&self, token: &AccessToken) -> Result<Vec<Building>> {
        let url = self.directory_url("resources/buildings");
        let mut buildings = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .http
                .request(Method::GET, &url)
                .query(&[("maxResults", DIRECTORY_PAGE_SIZE)]);
            if let Some(page) = page_token.as_deref() {
                builder = builder.query(&[("pageToken", page)]);
            }

            let page: BuildingList = self.execute_json(token, builder).await?;
            buildings.extend(page.buildings.into_iter().map(Building::from));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(buildings)
    }
}

/// Turn a non-2xx response into a classified domain error, preferring the
/// provider's own error message over the bare status.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = provider_message(status, &body);
    if status.is_server_error() {
        warn!(%status, %message, "calendar provider returned a server error");
    }
    Err(classify_provider_error(status, &message))
}

fn provider_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|err| RoombookError::from(InfraError::from(err)))
}
