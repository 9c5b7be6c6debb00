//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ROOMBOOK_GOOGLE_CLIENT_ID`: OAuth client id
//! - `ROOMBOOK_GOOGLE_CLIENT_SECRET`: OAuth client secret
//! - `ROOMBOOK_OAUTH_REDIRECT_URI`: Callback URL registered with Google
//!
//! Optional:
//! - `ROOMBOOK_BIND_ADDR`: Listen address (default `127.0.0.1:8080`)
//! - `ROOMBOOK_DB_PATH`: Database file path (default `roombook.db`)
//! - `ROOMBOOK_DB_POOL_SIZE`: Connection pool size (default 4)
//! - `ROOMBOOK_DIRECTORY_CUSTOMER`: Admin directory customer (default
//!   `my_customer`)
//! - `ROOMBOOK_SESSION_TTL_SECS`: Session lifetime in seconds
//! - `ROOMBOOK_NO_CONFIRMATION_DEFAULT`: Skip acceptance polling unless the
//!   request asks for it (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./roombook.json` or `./roombook.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use roombook_domain::{
    BookingConfig, Config, DatabaseConfig, GoogleConfig, Result, RoombookError, ServerConfig,
    SessionConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `RoombookError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `RoombookError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let google = GoogleConfig {
        client_id: env_var("ROOMBOOK_GOOGLE_CLIENT_ID")?,
        client_secret: env_var("ROOMBOOK_GOOGLE_CLIENT_SECRET")?,
        redirect_uri: env_var("ROOMBOOK_OAUTH_REDIRECT_URI")?,
        customer: std::env::var("ROOMBOOK_DIRECTORY_CUSTOMER")
            .unwrap_or_else(|_| GoogleConfig::default().customer),
        ..GoogleConfig::default()
    };

    let server = ServerConfig {
        bind_addr: std::env::var("ROOMBOOK_BIND_ADDR")
            .unwrap_or_else(|_| ServerConfig::default().bind_addr),
    };

    let database_defaults = DatabaseConfig::default();
    let database = DatabaseConfig {
        path: std::env::var("ROOMBOOK_DB_PATH").unwrap_or(database_defaults.path),
        pool_size: env_parse("ROOMBOOK_DB_POOL_SIZE", "pool size")?
            .unwrap_or(database_defaults.pool_size),
    };

    let session = SessionConfig {
        ttl_seconds: env_parse("ROOMBOOK_SESSION_TTL_SECS", "session ttl")?
            .unwrap_or(SessionConfig::default().ttl_seconds),
    };

    let booking = BookingConfig {
        no_confirmation_default: env_bool("ROOMBOOK_NO_CONFIRMATION_DEFAULT", false),
        ..BookingConfig::default()
    };

    Ok(Config { server, database, google, booking, session })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RoombookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RoombookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RoombookError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RoombookError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RoombookError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RoombookError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RoombookError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "roombook.json",
        "roombook.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `RoombookError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        RoombookError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable. Unset is `Ok(None)`, unparsable
/// is an error.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RoombookError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
