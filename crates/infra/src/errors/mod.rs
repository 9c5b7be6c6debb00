//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{classify_provider_error, InfraError};
