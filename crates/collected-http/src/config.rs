//! Configuration for the outbound HTTP client.

use std::time::Duration;

use collected_core::{DEFAULT_MAX_RESPONSE_BYTES, Settings};

/// Configuration for [`crate::ReqwestBackend`].
///
/// # Example
///
/// ```
/// use collected_http::HttpClientConfig;
/// use std::time::Duration;
///
/// let config = HttpClientConfig::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_max_body_bytes(1024 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string for outbound requests
    pub(crate) user_agent: String,
    /// Per-request timeout, independent of any command deadline
    pub(crate) timeout: Duration,
    /// Forward proxy for every request
    pub(crate) proxy: Option<String>,
    /// Largest response body accepted
    pub(crate) max_body_bytes: u64,
    /// Redirects followed before giving up
    pub(crate) max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("collected/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            proxy: None,
            max_body_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            max_redirects: 10,
        }
    }
}

impl HttpClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout, body cap and proxy taken from runtime settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_timeout(settings.command_timeout())
            .with_max_body_bytes(settings.max_response_bytes())
            .with_optional_proxy(settings.fetch_proxy.clone())
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    #[must_use]
    pub fn with_optional_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Defaults to 8 MiB.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, bytes: u64) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    #[must_use]
    pub const fn with_max_redirects(mut self, redirects: usize) -> Self {
        self.max_redirects = redirects;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::new();
        assert!(config.user_agent.starts_with("collected/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.proxy.is_none());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_RESPONSE_BYTES);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_builder_pattern() {
        let config = HttpClientConfig::new()
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(5))
            .with_proxy("http://proxy.internal:3128")
            .with_max_body_bytes(2048)
            .with_max_redirects(0);

        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.internal:3128"));
        assert_eq!(config.max_body_bytes, 2048);
        assert_eq!(config.max_redirects, 0);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            command_timeout_secs: Some(12),
            max_response_bytes: Some(4096),
            fetch_proxy: Some("http://proxy.internal:3128".to_string()),
            ..Settings::default()
        };

        let config = HttpClientConfig::from_settings(&settings);
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.max_body_bytes, 4096);
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.internal:3128"));
    }
}
