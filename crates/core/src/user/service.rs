//! Preferences service - per-user preferred building

use std::sync::Arc;

use roombook_domain::{Preferences, Result, RoombookError, UserRecord};
use tracing::{debug, info};

use super::ports::UserRepository;

/// Get/set access to a user's preferences
pub struct PreferencesService {
    repository: Arc<dyn UserRepository>,
}

impl PreferencesService {
    /// Service storing preferences in `repository`.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Record a successful login, creating the user on first sight.
    pub async fn register_login(&self, subject: &str, email: &str) -> Result<UserRecord> {
        if subject.trim().is_empty() {
            return Err(RoombookError::Validation("login is missing a subject id".into()));
        }
        let record = self.repository.ensure_user(subject, email).await?;
        info!(subject, "user login registered");
        Ok(record)
    }

    /// Preferences of `subject`; `NotFound` when the user never logged in.
    pub async fn get(&self, subject: &str) -> Result<Preferences> {
        self.repository
            .get_by_subject(subject)
            .await?
            .map(|record| record.preferences)
            .ok_or_else(|| RoombookError::NotFound(format!("no user record for {subject}")))
    }

    /// Replace the preferences of `subject` and return what was stored.
    pub async fn set(&self, subject: &str, preferences: Preferences) -> Result<Preferences> {
        validate_preferences(&preferences)?;

        if !self.repository.set_preferences(subject, &preferences).await? {
            return Err(RoombookError::NotFound(format!("no user record for {subject}")));
        }

        debug!(
            subject,
            building = preferences.building.as_ref().map(|b| b.id.as_str()),
            "preferences updated"
        );
        Ok(preferences)
    }
}

fn validate_preferences(preferences: &Preferences) -> Result<()> {
    if let Some(building) = &preferences.building {
        if building.id.trim().is_empty() || building.name.trim().is_empty() {
            return Err(RoombookError::Validation(
                "building must have a non-empty id and name".into(),
            ));
        }
    }
    Ok(())
}
