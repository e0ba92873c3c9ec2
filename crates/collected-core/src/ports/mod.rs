//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that command execution expects from the
//! host. They contain no implementation details: the production HTTP
//! client lives in `collected-http`, the fake one in [`crate::testing`].

pub mod http;

pub use http::{HttpBackend, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResult};
