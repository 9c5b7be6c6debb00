//! # Roombook API
//!
//! HTTP application layer - routes, handlers and the main entry point.
//!
//! This crate contains:
//! - axum handlers (frontend → backend bridge)
//! - Application context (dependency injection)
//! - Session extraction and error mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use router::router;
