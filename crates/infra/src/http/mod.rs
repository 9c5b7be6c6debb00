//! HTTP client shared by provider adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
