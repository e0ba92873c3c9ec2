//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use collected_core::{
    AwsCredentials, CommandRenderer, ExecutionContext, HttpBackend, Settings, validate_settings,
};
use collected_http::{HttpClientConfig, ReqwestBackend};
use tracing::info;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Command execution settings.
    pub settings: Settings,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Credentials for `/aws` commands, if any.
    pub aws_credentials: Option<AwsCredentials>,
}

impl ServerConfig {
    /// Config with the port and limits from `settings`.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            port: settings.server_port(),
            settings,
            cors: CorsConfig::default(),
            aws_credentials: None,
        }
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_aws_credentials(mut self, credentials: Option<AwsCredentials>) -> Self {
        self.aws_credentials = credentials;
        self
    }
}

/// Everything handlers need to run commands.
pub struct AxumContext {
    /// Outbound HTTP shared by every command.
    pub http: Arc<dyn HttpBackend>,
    /// Renderer without variables; handlers add each request's own.
    pub renderer: CommandRenderer,
    /// Deadline applied to every request's command.
    pub command_timeout: Duration,
    /// Credentials for `/aws` commands.
    pub aws_credentials: Option<AwsCredentials>,
}

impl AxumContext {
    pub fn new(http: Arc<dyn HttpBackend>, command_timeout: Duration) -> Self {
        Self {
            http,
            renderer: CommandRenderer::new(),
            command_timeout,
            aws_credentials: None,
        }
    }

    #[must_use]
    pub fn with_aws_credentials(mut self, credentials: Option<AwsCredentials>) -> Self {
        self.aws_credentials = credentials;
        self
    }

    /// A fresh context for one request, with its own deadline.
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(Arc::clone(&self.http))
            .with_timeout(self.command_timeout)
            .with_aws_credentials(self.aws_credentials.clone())
    }
}

/// Validate settings and build the server's services.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    validate_settings(&config.settings)?;

    let http = ReqwestBackend::new(&HttpClientConfig::from_settings(&config.settings))?;

    info!(
        command_timeout_secs = config.settings.command_timeout().as_secs(),
        max_response_bytes = config.settings.max_response_bytes(),
        proxied = config.settings.fetch_proxy.is_some(),
        aws = config.aws_credentials.is_some(),
        "Axum bootstrap complete"
    );

    Ok(AxumContext::new(Arc::new(http), config.settings.command_timeout())
        .with_aws_credentials(config.aws_credentials.clone()))
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config)?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("collected command server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
