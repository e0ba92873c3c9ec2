//! Axum-specific error types and mappings.
//!
//! Maps command failures to HTTP status codes and a JSON body of the form
//! `{"error": "...", "status": 400}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use collected_core::{CommandError, RunError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The command text or its parameters are invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A remote the command talked to failed or answered badly.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// The command ran out of time or was cancelled.
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    /// The server lacks configuration a command needs (credentials).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<CommandError> for HttpError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Parse(parse_err) => Self::BadRequest(parse_err.to_string()),
            CommandError::Run(run_err) => run_err.into(),
        }
    }
}

impl From<RunError> for HttpError {
    fn from(err: RunError) -> Self {
        let message = err.to_string();
        match err {
            _ if err.is_interrupted() => Self::GatewayTimeout(message),
            RunError::MissingCredentials { .. } => Self::ServiceUnavailable(message),
            RunError::InvalidCommand { .. } => Self::BadRequest(message),
            _ => Self::BadGateway(message),
        }
    }
}
