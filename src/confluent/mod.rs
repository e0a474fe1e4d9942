//! Confluent Cloud API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - API key/secret pairs and basic-auth headers
//! - [`http`] - HTTP gateway for REST API calls
//! - [`client`] - URL building, per-surface credentials, pagination
//! - [`environments`] - Environment listing
//! - [`statements`] - Flink SQL statement lookups and submission
//! - [`compute_pools`] - Flink compute pool lookups
//!
//! Lookups return a [`Fetched`] rather than text so callers and tests can
//! tell a payload from a failed call before anything is rendered.

pub mod auth;
pub mod client;
pub mod compute_pools;
pub mod environments;
pub mod http;
pub mod statements;

/// A remote call that failed or returned an empty document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailed {
    /// The URL of the failing request
    pub url: String,
}

/// Outcome of a remote lookup
pub type Fetched<T> = std::result::Result<T, FetchFailed>;
