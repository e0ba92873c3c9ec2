//! Outbound HTTP for Collected commands.
//!
//! Implements the core `HttpBackend` port with reqwest. Hosts build one
//! [`ReqwestBackend`] at startup and share it through every
//! `ExecutionContext`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod backend;
mod config;
mod error;

pub use backend::ReqwestBackend;
pub use config::HttpClientConfig;
pub use error::BuildError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use url as _;
#[cfg(test)]
use wiremock as _;
