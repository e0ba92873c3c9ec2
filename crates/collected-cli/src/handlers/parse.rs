//! `collected parse`: print what a command would do, without running it.

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Introspection JSON for `source`.
pub fn describe(ctx: &CliContext, source: &str) -> Result<String, CliError> {
    let command = ctx
        .renderer
        .parse(source)
        .map_err(|err| CliError::Parse(err.to_string()))?;
    let summary = command.summary(&ctx.config.variables);
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Execute the parse command.
pub fn execute(ctx: &CliContext, source: &str) -> Result<(), CliError> {
    println!("{}", describe(ctx, source)?);
    Ok(())
}
