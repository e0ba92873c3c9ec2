//! Execution context passed to every command run.
//!
//! The context bundles the host's outbound HTTP facility with cancellation
//! and deadline propagation. It is cheap to clone; clones share the same
//! backend and cancellation token.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{RunError, RunResult};
use crate::ports::{HttpBackend, HttpRequest, HttpResponse};

/// AWS access key material used to sign S3 requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

// Keep secrets out of logs.
impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything a command may use while running.
#[derive(Clone)]
pub struct ExecutionContext {
    http: Arc<dyn HttpBackend>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
    aws_credentials: Option<AwsCredentials>,
}

impl ExecutionContext {
    /// A context with no deadline and a fresh cancellation token.
    pub fn new(http: Arc<dyn HttpBackend>) -> Self {
        Self {
            http,
            cancel: CancellationToken::new(),
            deadline: None,
            aws_credentials: None,
        }
    }

    /// Bind the context to an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set an absolute deadline. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Set a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_aws_credentials(mut self, credentials: Option<AwsCredentials>) -> Self {
        self.aws_credentials = credentials;
        self
    }

    /// A context that is cancelled when this one is, but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
            aws_credentials: self.aws_credentials.clone(),
        }
    }

    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub const fn aws_credentials(&self) -> Option<&AwsCredentials> {
        self.aws_credentials.as_ref()
    }

    /// Fail fast if the context is already done.
    pub fn check(&self) -> RunResult<()> {
        if self.cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(RunError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Send `request` through the host backend.
    ///
    /// Returns as soon as the context is cancelled or its deadline elapses,
    /// dropping the in-flight request. The response is returned whatever its
    /// status; see [`ExecutionContext::send_expecting_success`].
    pub async fn send(&self, request: HttpRequest) -> RunResult<HttpResponse> {
        self.check()?;

        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "Sending command request");

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => Err(RunError::Cancelled),
                response = self.http.send(request) => response.map_err(RunError::from),
            }
        };

        let response = match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .map_err(|_| RunError::DeadlineExceeded)?,
            None => guarded.await,
        }?;

        debug!(%method, %url, status = response.status, "Command request finished");
        Ok(response)
    }

    /// Like [`ExecutionContext::send`], but turns a non-2xx status into
    /// [`RunError::HttpStatus`].
    pub async fn send_expecting_success(&self, request: HttpRequest) -> RunResult<HttpResponse> {
        let url = request.url.to_string();
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(RunError::HttpStatus {
                status: response.status,
                url,
            });
        }
        Ok(response)
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("deadline", &self.deadline)
            .field("aws_credentials", &self.aws_credentials)
            .finish_non_exhaustive()
    }
}
