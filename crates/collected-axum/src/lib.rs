//! Axum HTTP adapter for Collected commands.
//!
//! Exposes the command renderer over a small JSON API:
//!
//! - `GET /health`
//! - `POST /api/commands/render` runs a command and returns sanitized HTML
//! - `POST /api/commands/parse` returns what a command would do without running it

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;

// Silence unused dev-dependency warnings
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tower as _;
