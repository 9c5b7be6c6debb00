//! Application context - dependency injection container

use std::sync::Arc;

use roombook_core::{
    BookingService, CalendarGateway, Clock, PreferencesService, RoomService, SystemClock,
    UserRepository,
};
use roombook_domain::{Config, Result, RoombookError};
use roombook_infra::{
    DbManager, GoogleCalendarGateway, HttpClient, OAuthClient, SessionStore, SqliteUserRepository,
};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Loaded configuration.
    pub config: Config,
    /// SQLite pool, shared with the user repository.
    pub db: Arc<DbManager>,
    /// Booking flows.
    pub bookings: Arc<BookingService>,
    /// Room and building listings.
    pub rooms: Arc<RoomService>,
    /// Preferred building per user.
    pub preferences: Arc<PreferencesService>,
    /// Bearer sessions and pending logins.
    pub sessions: SessionStore,
    /// Identity provider client.
    pub oauth: OAuthClient,
    /// Cancelled when the server shuts down. In-flight booking flows observe
    /// it and roll back.
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Wire the production stack from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let http = HttpClient::from_config(&config.google)?;
        let gateway: Arc<dyn CalendarGateway> =
            Arc::new(GoogleCalendarGateway::new(http.clone(), config.google.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db.clone()));
        let oauth = OAuthClient::new(http, config.google.clone());

        info!(db_path = %db.path().display(), customer = %config.google.customer, "application context ready");

        Ok(Self::from_parts(config, db, gateway, users, Arc::new(SystemClock), oauth))
    }

    /// Assemble a context from already-built parts.
    pub fn from_parts(
        config: Config,
        db: Arc<DbManager>,
        gateway: Arc<dyn CalendarGateway>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        oauth: OAuthClient,
    ) -> Self {
        let bookings =
            Arc::new(BookingService::new(gateway.clone(), clock.clone(), config.booking.clone()));
        let rooms = Arc::new(RoomService::new(gateway, clock, config.booking.clone()));
        let preferences = Arc::new(PreferencesService::new(users));
        let sessions = SessionStore::new(&config.session);

        Self {
            config,
            db,
            bookings,
            rooms,
            preferences,
            sessions,
            oauth,
            shutdown: CancellationToken::new(),
        }
    }

    /// Check the components the service cannot run without.
    pub async fn health_check(&self) -> HealthStatus {
        let db = self.db.clone();
        let database = match task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => ComponentHealth::unhealthy("database", err.to_string()),
            Err(err) => ComponentHealth::unhealthy(
                "database",
                RoombookError::Internal(format!("health check task failed: {err}")).to_string(),
            ),
        };

        let mut status = HealthStatus::new().add_component(database);
        status.calculate_score();
        status
    }
}
