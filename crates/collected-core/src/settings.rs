//! Settings domain types and validation.
//!
//! Pure data: loading from the environment happens in the binaries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default port for the command rendering API.
pub const DEFAULT_SERVER_PORT: u16 = 9878;

/// Default upper bound on a single command's run time.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default cap on a fetched response body (8 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 8 * 1024 * 1024;

/// Runtime settings for command execution.
///
/// All fields are optional so partial configuration falls back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Deadline applied to every command run, in seconds (1-300).
    pub command_timeout_secs: Option<u64>,

    /// Largest response body an outbound request may return (1 KiB - 64 MiB).
    pub max_response_bytes: Option<u64>,

    /// Port for the rendering API.
    pub server_port: Option<u16>,

    /// Forward proxy for all outbound command requests.
    pub fetch_proxy: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            command_timeout_secs: Some(DEFAULT_COMMAND_TIMEOUT_SECS),
            max_response_bytes: Some(DEFAULT_MAX_RESPONSE_BYTES),
            server_port: Some(DEFAULT_SERVER_PORT),
            fetch_proxy: None,
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(
            self.command_timeout_secs
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
        )
    }

    pub fn max_response_bytes(&self) -> u64 {
        self.max_response_bytes.unwrap_or(DEFAULT_MAX_RESPONSE_BYTES)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_SERVER_PORT)
    }

}

/// Errors from settings validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Command timeout must be between 1 and 300 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("Max response size must be between 1 KiB and 64 MiB, got {0} bytes")]
    InvalidMaxResponseBytes(u64),

    #[error("Port must be 1024 or above, got {0}")]
    InvalidPort(u16),

    #[error("Fetch proxy is not a valid URL: {0}")]
    InvalidProxy(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(secs) = settings.command_timeout_secs {
        if !(1..=300).contains(&secs) {
            return Err(SettingsError::InvalidTimeout(secs));
        }
    }

    if let Some(bytes) = settings.max_response_bytes {
        if !(1024..=64 * 1024 * 1024).contains(&bytes) {
            return Err(SettingsError::InvalidMaxResponseBytes(bytes));
        }
    }

    if let Some(port) = settings.server_port {
        if port < 1024 {
            return Err(SettingsError::InvalidPort(port));
        }
    }

    if let Some(proxy) = &settings.fetch_proxy {
        if url::Url::parse(proxy).is_err() {
            return Err(SettingsError::InvalidProxy(proxy.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_accessors_fall_back_to_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.command_timeout(), Duration::from_secs(30));
        assert_eq!(settings.max_response_bytes(), DEFAULT_MAX_RESPONSE_BYTES);
        assert_eq!(settings.server_port(), DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_invalid_timeout() {
        let settings = Settings {
            command_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidTimeout(0))
        );
    }

    #[test]
    fn test_invalid_port() {
        let settings = Settings {
            server_port: Some(80),
            ..Settings::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::InvalidPort(80)));
    }

    #[test]
    fn test_invalid_proxy() {
        let settings = Settings {
            fetch_proxy: Some("not a url".to_string()),
            ..Settings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidProxy(_))
        ));
    }

    #[test]
    fn test_deserializes_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"server_port": 5000}"#).unwrap();
        assert_eq!(settings.server_port, Some(5000));
        assert!(settings.command_timeout_secs.is_none());
    }
}
