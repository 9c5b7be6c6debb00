//! In-memory session and pending-login stores

use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use roombook_domain::constants::LOGIN_STATE_TTL_SECS;
use roombook_domain::{AccessToken, Session, SessionConfig};
use tracing::debug;

use super::pkce::random_token;

const MAX_SESSIONS: u64 = 10_000;

/// Bearer-token sessions plus the PKCE verifiers of logins still waiting
/// for their callback. Entries expire on their own.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Session>,
    pending_logins: Cache<String, String>,
    ttl: Duration,
}

impl SessionStore {
    /// Empty store with sessions living at most `ttl_seconds`.
    pub fn new(config: &SessionConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_seconds.max(1));
        Self {
            sessions: Cache::builder().max_capacity(MAX_SESSIONS).time_to_live(ttl).build(),
            pending_logins: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_live(Duration::from_secs(LOGIN_STATE_TTL_SECS))
                .build(),
            ttl,
        }
    }

    /// Remember the code verifier for a login started with `state`.
    pub async fn remember_login(&self, state: String, code_verifier: String) {
        self.pending_logins.insert(state, code_verifier).await;
    }

    /// Consume the verifier for `state`. A state can be redeemed once.
    pub async fn take_login(&self, state: &str) -> Option<String> {
        self.pending_logins.remove(state).await
    }

    /// Open a session. It lives no longer than the configured TTL nor the
    /// provider token it wraps.
    pub async fn issue(
        &self,
        subject: String,
        email: String,
        access_token: AccessToken,
        token_expires_in: Option<u64>,
    ) -> (String, Session) {
        let lifetime = token_expires_in
            .map(|secs| Duration::from_secs(secs).min(self.ttl))
            .unwrap_or(self.ttl);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(lifetime).unwrap_or_else(|_| chrono::Duration::zero());

        let session = Session { subject, email, access_token, expires_at };
        let token = random_token();
        self.sessions.insert(token.clone(), session.clone()).await;
        debug!(subject = %session.subject, expires_at = %session.expires_at, "session issued");
        (token, session)
    }

    /// Live session for a bearer token.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token).await?;
        if session.expires_at <= Utc::now() {
            self.sessions.invalidate(token).await;
            return None;
        }
        Some(session)
    }

    /// Drop a session; unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }
}
