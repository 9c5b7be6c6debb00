//! Health report served by `GET /health`

use chrono::Utc;
use serde::Serialize;

/// Overall health: healthy only when every component is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Result of [`HealthStatus::calculate_score`].
    pub is_healthy: bool,
    /// Per-component results.
    pub components: Vec<ComponentHealth>,
    /// Unix seconds.
    pub timestamp: i64,
}

impl HealthStatus {
    /// Empty report stamped with the current time.
    pub fn new() -> Self {
        Self { is_healthy: true, components: Vec::new(), timestamp: Utc::now().timestamp() }
    }

    /// Append one component result.
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Recompute `is_healthy` from the components.
    pub fn calculate_score(&mut self) {
        self.is_healthy = self.components.iter().all(|component| component.is_healthy);
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    /// A passing component.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    /// A failing component with the reason.
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
