//! Error taxonomy for command parsing and execution.
//!
//! Parsing and execution fail in different ways and are reported through
//! separate types. Hosts that only want to display a message can use
//! [`CommandError`], which wraps both.

use thiserror::Error;

use crate::ports::HttpError;

/// Result type alias for parsing command input.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type alias for running a parsed command.
pub type RunResult<T> = Result<T, RunError>;

/// Errors raised while turning command text into a [`crate::Command`].
///
/// All parse errors are terminal: no partial command is ever returned.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained no command tokens.
    #[error("No command passed")]
    NoCommand,

    /// The top-level token is not a known family, or the family needs more tokens.
    #[error("Unknown command {path:?}")]
    UnknownCommand {
        /// The full command path that was given
        path: Vec<String>,
    },

    /// The family exists but does not understand the subcommand path.
    #[error("Unknown {family} subcommand(s) {subcommands:?}")]
    UnknownSubcommand {
        /// The family that rejected the path
        family: &'static str,
        /// The subcommand tokens after the family name
        subcommands: Vec<String>,
    },

    /// A color literal could not be parsed.
    #[error("Invalid color '{input}': expected #rgb or #rrggbb")]
    InvalidColor {
        /// The rejected input
        input: String,
    },

    /// A gradient was requested with no color stops.
    #[error("Gradient needs at least one color, one per line")]
    EmptyGradient,

    /// The parameter block is not valid, or misses a required field.
    ///
    /// Carries the decoder's message and position only, never an excerpt of
    /// the block: after substitution the block may hold secrets.
    #[error("Invalid parameters for /{command}{}: {message}", at_line(.line))]
    InvalidParams {
        /// Command path the parameters were meant for
        command: String,
        /// The decoder's description of the problem
        message: String,
        /// 1-based line of the problem in the parameter block, when known
        line: Option<usize>,
    },

    /// A URL-typed field does not hold an absolute URL.
    #[error("Invalid URL in `{field}`: '{value}' ({source})")]
    InvalidUrl {
        /// Parameter name
        field: &'static str,
        /// The rejected value
        value: String,
        /// Underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// A parameter is well-formed TOML but its value is not acceptable.
    #[error("Invalid value for `{field}`: '{value}' ({reason})")]
    InvalidField {
        /// Parameter name
        field: &'static str,
        /// The rejected value
        value: String,
        /// What the value must look like
        reason: &'static str,
    },

    /// A CSS selector could not be compiled.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// The rejected selector
        selector: String,
        /// Description from the selector parser
        message: String,
    },

    /// A `{{ name }}` placeholder refers to a variable the host did not supply.
    #[error("Unknown variable '{name}' in parameters")]
    UnknownVariable {
        /// The placeholder name
        name: String,
    },

    /// The caller-supplied preprocessing step failed.
    #[error("Could not preprocess parameters: {0}")]
    Preprocess(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while running a parsed command.
///
/// None of these are retried; the caller decides how to present them.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP backend could not complete the request.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The remote server answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The remote server answered with something we could not interpret.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the response
        message: String,
    },

    /// A remote service refused the operation and said why.
    #[error("{operation}: {reason}")]
    Remote {
        /// What was being attempted
        operation: String,
        /// The service's explanation
        reason: String,
    },

    /// A command built without its parser holds a value that does not validate.
    #[error("Invalid command: {message}")]
    InvalidCommand {
        /// The validation failure
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The command needs credentials the execution context does not carry.
    #[error("No {provider} credentials available")]
    MissingCredentials {
        /// Which provider's credentials are missing
        provider: &'static str,
    },

    /// The execution context was cancelled while the command was running.
    #[error("Command was cancelled")]
    Cancelled,

    /// The execution context's deadline elapsed while the command was running.
    #[error("Command timed out")]
    DeadlineExceeded,
}

#[allow(clippy::ref_option)]
fn at_line(line: &Option<usize>) -> String {
    line.map_or_else(String::new, |line| format!(" (line {line})"))
}

impl ParseError {
    /// Rewrite every piece of user-derived text the error carries.
    #[must_use]
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::UnknownCommand { path } => Self::UnknownCommand {
                path: path.iter().map(|token| f(token)).collect(),
            },
            Self::UnknownSubcommand {
                family,
                subcommands,
            } => Self::UnknownSubcommand {
                family,
                subcommands: subcommands.iter().map(|token| f(token)).collect(),
            },
            Self::InvalidColor { input } => Self::InvalidColor { input: f(&input) },
            Self::InvalidParams {
                command,
                message,
                line,
            } => Self::InvalidParams {
                command,
                message: f(&message),
                line,
            },
            Self::InvalidUrl {
                field,
                value,
                source,
            } => Self::InvalidUrl {
                field,
                value: f(&value),
                source,
            },
            Self::InvalidField {
                field,
                value,
                reason,
            } => Self::InvalidField {
                field,
                value: f(&value),
                reason,
            },
            Self::InvalidSelector { selector, message } => Self::InvalidSelector {
                selector: f(&selector),
                message: f(&message),
            },
            other @ (Self::NoCommand
            | Self::EmptyGradient
            | Self::UnknownVariable { .. }
            | Self::Preprocess(_)) => other,
        }
    }
}

impl RunError {
    /// Whether this error was caused by the context rather than the command.
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Rewrite every piece of request-derived text the error carries.
    #[must_use]
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::Http(err) => Self::Http(err.map_text(f)),
            Self::HttpStatus { status, url } => Self::HttpStatus { status, url: f(&url) },
            Self::InvalidResponse { message } => Self::InvalidResponse { message: f(&message) },
            Self::Remote { operation, reason } => Self::Remote {
                operation: f(&operation),
                reason: f(&reason),
            },
            Self::InvalidCommand { message } => Self::InvalidCommand { message: f(&message) },
            other @ (Self::Json(_)
            | Self::MissingCredentials { .. }
            | Self::Cancelled
            | Self::DeadlineExceeded) => other,
        }
    }
}

/// Either kind of command failure.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Execution failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_message_lists_path() {
        let err = ParseError::UnknownCommand {
            path: vec!["nonsense".to_string()],
        };
        assert!(err.to_string().contains("nonsense"));
    }

    #[test]
    fn test_http_status_message() {
        let err = RunError::HttpStatus {
            status: 503,
            url: "https://example.com/graphql".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("example.com"));
    }

    #[test]
    fn test_interrupted_errors() {
        assert!(RunError::Cancelled.is_interrupted());
        assert!(RunError::DeadlineExceeded.is_interrupted());
        assert!(
            !RunError::MissingCredentials { provider: "AWS" }.is_interrupted()
        );
    }

    #[test]
    fn test_invalid_params_message_has_no_excerpt() {
        let err = ParseError::InvalidParams {
            command: "graphql".to_string(),
            message: "expected newline".to_string(),
            line: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameters for /graphql (line 4): expected newline"
        );
    }

    #[test]
    fn test_map_text_rewrites_values() {
        let err = ParseError::InvalidField {
            field: "key",
            value: "a/secret".to_string(),
            reason: "nope",
        }
        .map_text(|text| text.replace("secret", "***"));
        assert!(err.to_string().contains("a/***"));

        let err = RunError::HttpStatus {
            status: 404,
            url: "https://example.com/secret".to_string(),
        }
        .map_text(|text| text.replace("secret", "***"));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_command_error_is_transparent() {
        let err: CommandError = ParseError::NoCommand.into();
        assert_eq!(err.to_string(), "No command passed");
    }
}
