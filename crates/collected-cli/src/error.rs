//! CLI-specific error types and mappings.
//!
//! Maps command failures to exit codes and user-facing messages.

use collected_core::{CommandError, RunError, SettingsError};
use collected_http::BuildError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument error (conflicting flags, nothing to read).
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The command text could not be parsed.
    #[error("{0}")]
    Parse(String),

    /// A remote the command depends on failed.
    #[error("{0}")]
    Remote(String),

    /// The command ran past its deadline.
    #[error("{0}")]
    Timeout(String),

    /// Interrupted with Ctrl-C.
    #[error("Cancelled")]
    Cancelled,

    /// IO error (file not found, broken pipe, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The web server failed to start or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where a category fits:
    /// - 64: usage error
    /// - 65: bad command input
    /// - 69: remote unavailable
    /// - 74: IO error
    /// - 75: temporary failure (timeout)
    /// - 78: configuration error
    /// - 130: interrupted
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 64, // EX_USAGE
            Self::Parse(_) => 65,     // EX_DATAERR
            Self::Remote(_) => 69,    // EX_UNAVAILABLE
            Self::Io(_) => 74,        // EX_IOERR
            Self::Timeout(_) => 75,   // EX_TEMPFAIL
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Cancelled => 130,
            Self::Server(_) => 1,
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Parse(parse_err) => Self::Parse(parse_err.to_string()),
            CommandError::Run(run_err) => run_err.into(),
        }
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        let message = err.to_string();
        match err {
            RunError::Cancelled => Self::Cancelled,
            RunError::DeadlineExceeded => Self::Timeout(message),
            RunError::MissingCredentials { .. } => Self::Config(message),
            RunError::InvalidCommand { .. } => Self::Parse(message),
            RunError::Http(_)
            | RunError::HttpStatus { .. }
            | RunError::InvalidResponse { .. }
            | RunError::Remote { .. }
            | RunError::Json(_) => Self::Remote(message),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<BuildError> for CliError {
    fn from(err: BuildError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Server(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collected_core::ParseError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(CommandError::from(ParseError::NoCommand)).exit_code(), 65);
        assert_eq!(CliError::from(RunError::DeadlineExceeded).exit_code(), 75);
        assert_eq!(CliError::from(RunError::Cancelled).exit_code(), 130);
        assert_eq!(
            CliError::from(RunError::MissingCredentials { provider: "AWS" }).exit_code(),
            78
        );
        assert_eq!(
            CliError::from(RunError::HttpStatus {
                status: 404,
                url: "https://example.com".to_string()
            })
            .exit_code(),
            69
        );
    }
}
