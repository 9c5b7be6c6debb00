//! Room and building types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde::sentinel_timestamp;

/// Bookable resource as the directory describes it.
///
/// Field names follow the provider schema; [`Room`] is the flattened shape
/// the rest of the application works with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryResource {
    pub resource_email: Option<String>,
    pub resource_name: Option<String>,
    pub capacity: Option<u32>,
    pub building_id: Option<String>,
    pub floor_name: Option<String>,
    #[serde(default)]
    pub feature_instances: Vec<FeatureInstance>,
    pub generated_resource_name: Option<String>,
    pub resource_category: Option<String>,
}

/// Feature attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInstance {
    pub feature: Feature,
}

/// Named room feature such as a projector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
}

/// Flat room record served to the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Calendar resource email.
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub building: String,
    /// Floor name, empty when unknown.
    pub floor: String,
    pub features: Vec<String>,
    /// Start of the next busy block, `None` when free (`"-1"` on the wire).
    #[serde(with = "sentinel_timestamp")]
    pub next_calendar_event: Option<DateTime<Utc>>,
    /// Building and floor as one display string.
    pub location: String,
}

impl Room {
    /// A room without an id carries no usable information.
    pub fn is_empty(&self) -> bool {
        self.id.trim().is_empty()
    }

    /// Whether nothing is scheduled in the queried window.
    pub fn is_free(&self) -> bool {
        self.next_calendar_event.is_none()
    }
}

/// Building a room belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resource_reads_provider_fields() {
        let json = r#"{
            "resourceEmail": "c_1@resource.calendar.google.com",
            "resourceName": "Kallio",
            "capacity": 8,
            "buildingId": "HQ",
            "floorName": "3",
            "featureInstances": [{"feature": {"name": "Screen"}}],
            "generatedResourceName": "HQ-3-Kallio (8)"
        }"#;

        let resource: DirectoryResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.resource_name.as_deref(), Some("Kallio"));
        assert_eq!(resource.feature_instances[0].feature.name, "Screen");
        assert!(resource.resource_category.is_none());
    }

    #[test]
    fn room_serializes_free_sentinel() {
        let room = Room { id: "r@x".into(), ..Room::default() };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["nextCalendarEvent"], "-1");
        assert!(room.is_free());
        assert!(!room.is_empty());
        assert!(Room::default().is_empty());
    }
}
