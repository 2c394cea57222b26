use thiserror::Error;

/// Failure of a single catalog call
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("not logged in to {0}")]
    NotAuthenticated(String),

    #[error("invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("unexpected catalog response: {0}")]
    Protocol(String),
}
