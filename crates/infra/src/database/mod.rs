//! Database implementations

pub mod manager;
pub mod user_repository;

pub use manager::{DbConnection, DbManager};
pub use user_repository::SqliteUserRepository;
