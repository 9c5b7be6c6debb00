//! Port interfaces for user records and preferences
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for the preferences store.

use async_trait::async_trait;
use roombook_domain::{Preferences, Result, UserRecord};

/// Trait for user record persistence and retrieval
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user record by subject id
    async fn get_by_subject(&self, subject: &str) -> Result<Option<UserRecord>>;

    /// Create the record with empty preferences if missing; refresh the email
    /// otherwise. Safe to call on every login.
    async fn ensure_user(&self, subject: &str, email: &str) -> Result<UserRecord>;

    /// Replace the preferences of an existing user. Returns `false` when no
    /// record exists for `subject`.
    async fn set_preferences(&self, subject: &str, preferences: &Preferences) -> Result<bool>;
}
