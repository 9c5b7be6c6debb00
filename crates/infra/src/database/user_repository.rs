//! User record repository backed by SQLite
//!
//! Preferences are stored as a JSON column so new preference fields do not
//! need a migration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use roombook_core::user::ports::UserRepository as UserRepositoryPort;
use roombook_domain::{Preferences, Result as DomainResult, RoombookError, UserRecord};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::{map_sql_error, DbConnection, DbManager};
use crate::errors::InfraError;

/// SQLite-backed implementation of `UserRepository`
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn get_by_subject(&self, subject: &str) -> DomainResult<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let subject = subject.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserRecord>> {
            let conn = db.get_connection()?;
            select_user(&conn, &subject)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn ensure_user(&self, subject: &str, email: &str) -> DomainResult<UserRecord> {
        let db = Arc::clone(&self.db);
        let subject = subject.to_string();
        let email = email.to_string();

        task::spawn_blocking(move || -> DomainResult<UserRecord> {
            let conn = db.get_connection()?;
            let now = Utc::now().timestamp();

            conn.execute(
                "INSERT INTO users (subject, email, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(subject) DO UPDATE SET email = excluded.email,
                                                    updated_at = excluded.updated_at",
                params![&subject, &email, now],
            )
            .map_err(map_sql_error)?;

            select_user(&conn, &subject)?.ok_or_else(|| {
                RoombookError::Database(format!("user {subject} missing after upsert"))
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_preferences(
        &self,
        subject: &str,
        preferences: &Preferences,
    ) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let subject = subject.to_string();
        let preferences_json = serde_json::to_string(preferences)
            .map_err(|err| RoombookError::from(InfraError::from(err)))?;

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE users SET preferences_json = ?1, updated_at = ?2 WHERE subject = ?3",
                    params![&preferences_json, Utc::now().timestamp(), &subject],
                )
                .map_err(map_sql_error)?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn select_user(conn: &DbConnection, subject: &str) -> DomainResult<Option<UserRecord>> {
    conn.query_row(
        "SELECT subject, email, preferences_json, created_at, updated_at
         FROM users WHERE subject = ?1",
        params![subject],
        map_user_row,
    )
    .optional()
    .map_err(map_sql_error)
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    let preferences_json: String = row.get(2)?;
    let preferences: Preferences = serde_json::from_str(&preferences_json).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(UserRecord {
        subject: row.get(0)?,
        email: row.get(1)?,
        preferences,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_join_error(err: task::JoinError) -> RoombookError {
    RoombookError::Internal(format!("blocking database task failed: {err}"))
}
