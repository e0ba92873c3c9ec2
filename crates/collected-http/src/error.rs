//! Errors from building the HTTP client.
//!
//! Request-time failures are reported through the core `HttpError` type.

use thiserror::Error;

/// The client could not be constructed from its configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The proxy URL was rejected.
    #[error("Invalid proxy '{proxy}': {source}")]
    InvalidProxy {
        /// The configured proxy
        proxy: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// reqwest refused the client configuration (TLS backend, etc.).
    #[error("Cannot create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
