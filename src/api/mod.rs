//! REST API client module for the dashboard backend.
//!
//! `ApiClient` is the single chokepoint for resource requests; it attaches
//! the stored JWT bearer token to every request except token-obtain and
//! register.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
