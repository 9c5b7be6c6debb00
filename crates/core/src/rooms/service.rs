//! Room directory and availability

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use roombook_domain::constants::FREE_BUSY_BATCH_SIZE;
use roombook_domain::{AccessToken, BookingConfig, Building, Result, Room};
use tracing::{debug, instrument};

use super::availability::is_free;
use crate::booking::simplify::simplify_room;
use crate::calendar_ports::CalendarGateway;
use crate::clock::Clock;

/// Lists rooms together with when they are next busy.
pub struct RoomService {
    gateway: Arc<dyn CalendarGateway>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl RoomService {
    /// Service over `gateway`, with the lookahead window starting at `clock.now()`.
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self { gateway, clock, config }
    }

    /// Free/busy for any number of ids, queried in provider-sized batches one
    /// after another and merged into a single map.
    pub async fn query_free_busy_batched(
        &self,
        token: &AccessToken,
        ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, DateTime<Utc>>> {
        let batch_size = self.config.free_busy_batch_size.clamp(1, FREE_BUSY_BATCH_SIZE);
        let mut merged = HashMap::with_capacity(ids.len());

        for (index, batch) in ids.chunks(batch_size).enumerate() {
            debug!(batch = index, size = batch.len(), "querying free/busy batch");
            let result = self.gateway.free_busy_query(token, batch, start, end).await?;
            merged.extend(result);
        }

        Ok(merged)
    }

    /// Directory rooms, optionally for one building, with
    /// `next_calendar_event` set to the start of the first busy block within
    /// the lookahead window (`None` when free throughout).
    #[instrument(skip(self, token))]
    pub async fn list_rooms(&self, token: &AccessToken, building: Option<&str>) -> Result<Vec<Room>> {
        let resources = self.gateway.list_rooms(token, building).await?;
        let mut rooms: Vec<Room> = resources
            .iter()
            .map(simplify_room)
            .filter(|room| !room.is_empty())
            .collect();

        if rooms.is_empty() {
            return Ok(rooms);
        }

        let start = self.clock.now();
        let end = start + Duration::hours(self.config.room_lookahead_hours);
        let ids: Vec<String> = rooms.iter().map(|room| room.id.clone()).collect();
        let free_busy = self.query_free_busy_batched(token, &ids, start, end).await?;

        for room in &mut rooms {
            room.next_calendar_event = match free_busy.get(&room.id) {
                Some(next) if !is_free(*next, end) => Some(*next),
                Some(_) => None,
                None => {
                    debug!(room_id = %room.id, "no free/busy entry, reporting as free");
                    None
                }
            };
        }

        Ok(rooms)
    }

    /// All buildings in the directory.
    pub async fn list_buildings(&self, token: &AccessToken) -> Result<Vec<Building>> {
        self.gateway.list_buildings(token).await
    }
}
