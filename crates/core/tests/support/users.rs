use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use roombook_core::UserRepository;
use roombook_domain::{Preferences, Result as DomainResult, UserRecord};

/// In-memory `UserRepository` keyed by subject id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_subject(&self, subject: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(subject).cloned())
    }

    async fn ensure_user(&self, subject: &str, email: &str) -> DomainResult<UserRecord> {
        let mut users = self.users.lock().unwrap();
        let record = users.entry(subject.to_string()).or_insert_with(|| UserRecord {
            subject: subject.to_string(),
            email: email.to_string(),
            preferences: Preferences::default(),
            created_at: 0,
            updated_at: 0,
        });
        record.email = email.to_string();
        Ok(record.clone())
    }

    async fn set_preferences(
        &self,
        subject: &str,
        preferences: &Preferences,
    ) -> DomainResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(subject) {
            Some(record) => {
                record.preferences = preferences.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
