//! Adapters for the external lookup services.
//!
//! All calls are blocking with a request timeout. Failures are classified
//! into [`LookupError`] and are never retried.

mod geocode;
mod postal;
mod registry;
mod slot;
pub mod summary;

use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

pub use geocode::Geocoder;
pub use postal::{autofill_lookup, PostalCodeClient, PostalRecord};
pub use registry::{RegistryClient, RegistryRecord};
pub use slot::{RequestSlot, Ticket};
pub use summary::{RemoteSummarizer, SummaryGenerator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("partnerhub/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Incomplete {what}: expected {expected} digits, got {got}")]
    Incomplete {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

fn http_client() -> LookupResult<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LookupError::Connection(e.to_string()))
}

/// Join a base URL and a path without doubling the slash.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
