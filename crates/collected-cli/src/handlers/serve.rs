//! `collected serve`: run the command API.

use anyhow::Result;
use collected_axum::{ServerConfig, start_server};
use tracing::warn;

use crate::bootstrap::CliConfig;

/// Server configuration from the environment config and flags.
///
/// Configured parameter variables stay with the CLI; API callers send their own.
pub fn server_config(
    config: &CliConfig,
    port: Option<u16>,
    allowed_origins: Vec<String>,
) -> ServerConfig {
    let mut server = ServerConfig::from_settings(config.settings.clone())
        .with_aws_credentials(config.aws_credentials.clone());
    if !config.variables.is_empty() {
        warn!("COLLECTED_GITHUB_TOKEN is only used by run and parse; API callers must send their own variables");
    }
    if let Some(port) = port {
        server = server.with_port(port);
    }
    if !allowed_origins.is_empty() {
        server = server.with_allowed_origins(allowed_origins);
    }
    server
}

/// Execute the serve command. Runs until the server stops.
pub async fn execute(config: &CliConfig, port: Option<u16>, allowed_origins: Vec<String>) -> Result<()> {
    start_server(server_config(config, port, allowed_origins)).await
}

#[cfg(test)]
mod tests {
    use collected_axum::CorsConfig;
    use collected_core::DEFAULT_SERVER_PORT;

    use super::*;

    #[test]
    fn test_defaults() {
        let server = server_config(&CliConfig::default(), None, Vec::new());
        assert_eq!(server.port, DEFAULT_SERVER_PORT);
        assert!(matches!(server.cors, CorsConfig::AllowAll));
    }

    #[test]
    fn test_flags_override() {
        let server = server_config(
            &CliConfig::default(),
            Some(4321),
            vec!["https://collected.press".to_string()],
        );
        assert_eq!(server.port, 4321);
        assert!(matches!(server.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 1));
    }
}
