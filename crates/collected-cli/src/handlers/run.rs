//! `collected run`: execute a command and print the result.

use collected_core::{CommandResult, HtmlSanitizer, RenderedCommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// How a result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Sanitized HTML.
    Html,
    Plain,
    /// Unsanitized HTML; refused for untrusted results.
    Raw,
}

impl OutputMode {
    pub const fn from_flags(plain: bool, raw: bool) -> Self {
        if raw {
            Self::Raw
        } else if plain {
            Self::Plain
        } else {
            Self::Html
        }
    }
}

/// Format a result for the terminal.
pub fn format_output(
    result: &CommandResult,
    mode: OutputMode,
    sanitizer: &dyn HtmlSanitizer,
) -> Result<String, CliError> {
    match mode {
        OutputMode::Html => Ok(RenderedCommand::from_result(result, sanitizer).html),
        OutputMode::Plain => Ok(result.plain_text().to_string()),
        OutputMode::Raw if result.dangerous_html_is_safe() => Ok(result.unsafe_html().to_string()),
        OutputMode::Raw => Err(CliError::Arguments(
            "--raw is only available for trusted results; this command returns untrusted HTML"
                .to_string(),
        )),
    }
}

/// Run `source` until it finishes or `cancel` fires, and format the result.
pub async fn render(
    ctx: &CliContext,
    source: &str,
    mode: OutputMode,
    cancel: CancellationToken,
) -> Result<String, CliError> {
    let exec_ctx = ctx.execution_context(cancel);
    let result = ctx.renderer.execute(source, &exec_ctx).await?;
    debug!(trust = ?result.trust(), "Command finished");
    format_output(&result, mode, ctx.renderer.sanitizer())
}

/// Execute the run command. Ctrl-C cancels the in-flight command.
pub async fn execute(ctx: &CliContext, source: &str, mode: OutputMode) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling command");
                cancel.cancel();
            }
        })
    };

    let output = render(ctx, source, mode, cancel).await;
    watcher.abort();

    println!("{}", output?);
    Ok(())
}
