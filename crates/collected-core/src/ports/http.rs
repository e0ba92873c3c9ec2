//! Outbound HTTP port.
//!
//! Commands never construct HTTP clients themselves. They describe a request
//! and hand it to the execution context, which forwards it to whatever
//! [`HttpBackend`] the host installed (normally the platform's proxied
//! fetch facility).

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors from an HTTP backend.
///
/// Non-success statuses are NOT errors at this level; they come back as a
/// normal [`HttpResponse`] and the command decides what they mean.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, TLS or transport failure.
    #[error("Network error: {message}")]
    Network {
        /// Description of the failure
        message: String,
    },

    /// The request could not be built (bad header, unsupported scheme...).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request
        message: String,
    },

    /// The response body exceeded the configured size cap.
    #[error("Response body exceeded {limit} bytes")]
    BodyTooLarge {
        /// The configured cap in bytes
        limit: u64,
    },
}

impl HttpError {
    /// Rewrite the error's description, which may quote the request URL.
    #[must_use]
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::Network { message } => Self::Network { message: f(&message) },
            Self::InvalidRequest { message } => Self::InvalidRequest { message: f(&message) },
            other @ Self::BodyTooLarge { .. } => other,
        }
    }
}

/// Result type alias for HTTP port operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP methods used by commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Header pairs in insertion order. Names are compared case-insensitively.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A `GET` request with no headers.
    pub const fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `POST` request carrying `body`.
    pub fn post(url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
        .with_body(body)
    }

    /// Set a header, replacing any existing header with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as returned by the backend, body fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Trait for HTTP backends that can execute a single request.
///
/// Implementations must not retry: a transient failure is surfaced directly
/// to the command and from there to the caller.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Execute `request` and buffer the full response.
    async fn send(&self, request: HttpRequest) -> HttpResult<HttpResponse>;
}
