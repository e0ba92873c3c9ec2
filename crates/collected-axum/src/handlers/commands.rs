//! Command handlers - parse and render slash commands.
//!
//! Only variables sent with the request are substituted.

use axum::Json;
use axum::extract::State;
use collected_core::{CommandError, CommandSummary, RenderedCommand};
use tracing::debug;

use crate::dto::CommandRequest;
use crate::error::HttpError;
use crate::state::AppState;

/// Run a command and return its sanitized output.
pub async fn render(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<RenderedCommand>, HttpError> {
    let renderer = state.renderer.clone().with_variables(req.variables());
    let ctx = state.execution_context();

    let rendered = renderer.render(&req.source, &ctx).await?;
    debug!(
        bytes = rendered.html.len(),
        full_width = rendered.wants_full_width,
        "Rendered command"
    );
    Ok(Json(rendered))
}

/// Parse a command without running it.
pub async fn parse(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandSummary>, HttpError> {
    let variables = req.variables();
    let renderer = state.renderer.clone().with_variables(variables.clone());

    let command = renderer.parse(&req.source).map_err(CommandError::from)?;
    Ok(Json(command.summary(&variables)))
}
