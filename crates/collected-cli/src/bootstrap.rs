//! CLI bootstrap - the composition root.
//!
//! Reads configuration from the environment and wires the reqwest backend
//! into a renderer. Handlers only ever see [`CliContext`].

use std::str::FromStr;
use std::sync::Arc;

use collected_core::{
    AwsCredentials, CommandRenderer, ExecutionContext, HttpBackend, ParamVariables, Settings,
    validate_settings,
};
use collected_http::{HttpClientConfig, ReqwestBackend};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub settings: Settings,
    /// Values for `{{name}}` placeholders in parameter blocks.
    pub variables: ParamVariables,
    pub aws_credentials: Option<AwsCredentials>,
}

impl CliConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let settings = Settings {
            command_timeout_secs: parse_var(&lookup, "COLLECTED_COMMAND_TIMEOUT_SECS")?,
            max_response_bytes: parse_var(&lookup, "COLLECTED_MAX_RESPONSE_BYTES")?,
            server_port: parse_var(&lookup, "COLLECTED_PORT")?,
            fetch_proxy: lookup("COLLECTED_FETCH_PROXY"),
        };
        validate_settings(&settings)?;

        let mut variables = ParamVariables::new();
        if let Some(token) = lookup("COLLECTED_GITHUB_TOKEN") {
            variables.insert(ParamVariables::GITHUB_OAUTH_TOKEN, token);
        }

        let aws_credentials = match (lookup("AWS_ACCESS_KEY_ID"), lookup("AWS_SECRET_ACCESS_KEY")) {
            (Some(id), Some(secret)) => {
                let credentials = AwsCredentials::new(id, secret);
                Some(match lookup("AWS_SESSION_TOKEN") {
                    Some(token) => credentials.with_session_token(token),
                    None => credentials,
                })
            }
            _ => None,
        };

        Ok(Self {
            settings,
            variables,
            aws_credentials,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, CliError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| CliError::Config(format!("{name} must be a number, got '{value}'")))
        })
        .transpose()
}

/// Log filter for the CLI: `RUST_LOG` wins, `-v` means debug, otherwise info.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub http: Arc<dyn HttpBackend>,
    pub renderer: CommandRenderer,
}

impl CliContext {
    /// Compose a context around an existing backend.
    pub fn with_backend(config: CliConfig, http: Arc<dyn HttpBackend>) -> Self {
        let renderer = CommandRenderer::new().with_variables(config.variables.clone());
        Self {
            config,
            http,
            renderer,
        }
    }

    /// Execution context for one run, cancelled through `cancel`.
    pub fn execution_context(&self, cancel: CancellationToken) -> ExecutionContext {
        ExecutionContext::new(Arc::clone(&self.http))
            .with_cancellation(cancel)
            .with_timeout(self.config.settings.command_timeout())
            .with_aws_credentials(self.config.aws_credentials.clone())
    }
}

/// Bootstrap the CLI with the reqwest backend.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let http = ReqwestBackend::new(&HttpClientConfig::from_settings(&config.settings))?;
    debug!(
        timeout_secs = config.settings.command_timeout().as_secs(),
        aws = config.aws_credentials.is_some(),
        "CLI bootstrap complete"
    );
    Ok(CliContext::with_backend(config, Arc::new(http)))
}
