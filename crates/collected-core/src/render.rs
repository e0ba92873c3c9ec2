//! Turning command text into HTML ready to embed in a post.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::commands::{Command, ParamVariables, parse_command_input};
use crate::context::ExecutionContext;
use crate::error::{CommandError, ParseResult};
use crate::html::escape_html;
use crate::result::CommandResult;
use crate::sanitize::{HtmlSanitizer, UgcSanitizer, safe_html_for_command_result};

/// A command's output after the sanitization gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCommand {
    /// Browser-safe HTML.
    pub html: String,
    pub plain_text: String,
    pub wants_full_width: bool,
}

impl RenderedCommand {
    pub fn from_result(result: &CommandResult, sanitizer: &dyn HtmlSanitizer) -> Self {
        Self {
            html: safe_html_for_command_result(result, sanitizer),
            plain_text: result.plain_text().to_string(),
            wants_full_width: result.wants_full_width(),
        }
    }
}

/// Parses, runs and sanitizes commands with one sanitizer and one set of
/// parameter variables.
#[derive(Clone)]
pub struct CommandRenderer {
    sanitizer: Arc<dyn HtmlSanitizer>,
    variables: ParamVariables,
}

impl CommandRenderer {
    /// A renderer using the UGC sanitizer and no variables.
    pub fn new() -> Self {
        Self {
            sanitizer: Arc::new(UgcSanitizer::new()),
            variables: ParamVariables::new(),
        }
    }

    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn HtmlSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: ParamVariables) -> Self {
        self.variables = variables;
        self
    }

    pub fn sanitizer(&self) -> &dyn HtmlSanitizer {
        self.sanitizer.as_ref()
    }

    /// Parse `source`, substituting this renderer's variables.
    ///
    /// Variable values never appear in the returned error.
    pub fn parse(&self, source: &str) -> ParseResult<Command> {
        parse_command_input(source, |body| self.variables.preprocess(body))
            .map_err(|err| err.map_text(|text| self.variables.redact(text)))
    }

    /// Parse and run `source`, returning the result before sanitization.
    pub async fn execute(
        &self,
        source: &str,
        ctx: &ExecutionContext,
    ) -> Result<CommandResult, CommandError> {
        let command = self.parse(source)?;
        command
            .run(ctx)
            .await
            .map_err(|err| CommandError::Run(err.map_text(|text| self.variables.redact(text))))
    }

    /// Parse, run and sanitize `source`.
    pub async fn render(
        &self,
        source: &str,
        ctx: &ExecutionContext,
    ) -> Result<RenderedCommand, CommandError> {
        let result = self.execute(source, ctx).await?;
        Ok(RenderedCommand::from_result(&result, self.sanitizer()))
    }

    /// The fragment a post shows for `source`.
    ///
    /// Success is wrapped in the command result box; any failure becomes an
    /// escaped `<p>` with the error message instead.
    pub async fn render_block(&self, source: &str, ctx: &ExecutionContext) -> String {
        match self.render(source, ctx).await {
            Ok(rendered) => format!(
                r#"<div class="p-2 border-t-2 border-green bg-green-lightest rounded-sm">{}</div>"#,
                rendered.html
            ),
            Err(err) => {
                warn!(error = %err, "Command failed to render");
                format!("<p>{}</p>", escape_html(&err.to_string()))
            }
        }
    }
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRenderer")
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingBackend, FakeBackend};

    fn ctx(backend: FakeBackend) -> ExecutionContext {
        ExecutionContext::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_render_trusted_result() {
        let rendered = CommandRenderer::new()
            .render("/color #ff8800", &ctx(FakeBackend::new()))
            .await
            .unwrap();

        assert!(rendered.html.contains("background-color:#ff8800"));
        assert_eq!(rendered.plain_text, "#ff8800");
        assert!(!rendered.wants_full_width);
    }

    #[tokio::test]
    async fn test_render_sanitizes_untrusted_result() {
        let page = r#"<div id="x"><p onclick="steal()">hello</p><script>alert(1)</script></div>"#;
        let backend = FakeBackend::new().with_text("example.com", 200, page);

        let rendered = CommandRenderer::new()
            .render(
                "/web snippet\nurl = \"https://example.com/\"\nselector = \"#x\"",
                &ctx(backend),
            )
            .await
            .unwrap();

        assert!(rendered.html.contains("<p>hello</p>"));
        assert!(!rendered.html.contains("onclick"));
        assert!(!rendered.html.contains("alert(1)"));
    }

    #[tokio::test]
    async fn test_render_substitutes_variables() {
        let backend = std::sync::Arc::new(FakeBackend::new().with_json(
            "api.github.com",
            &serde_json::json!({"data": {"viewer": {"login": "octocat"}}}),
        ));
        let renderer = CommandRenderer::new()
            .with_variables(ParamVariables::new().with_github_oauth_token("gho_abc"));
        let source = "/graphql\nendpoint = \"https://api.github.com/graphql\"\nquery = \"{ viewer { login } }\"\n[headers]\nAuthorization = \"Bearer {{ github_oauth_token }}\"";

        renderer
            .render(source, &ExecutionContext::new(backend.clone()))
            .await
            .unwrap();

        assert_eq!(
            backend.requests()[0].header("Authorization"),
            Some("Bearer gho_abc")
        );
    }

    #[tokio::test]
    async fn test_render_block_wraps_success() {
        let block = CommandRenderer::new()
            .render_block("/color #000", &ctx(FakeBackend::new()))
            .await;
        assert!(block.starts_with(
            r#"<div class="p-2 border-t-2 border-green bg-green-lightest rounded-sm"><div style="#
        ));
        assert!(block.ends_with("</dl></div>"));
    }

    #[tokio::test]
    async fn test_render_block_escapes_errors() {
        let block = CommandRenderer::new()
            .render_block("/<script>", &ctx(FakeBackend::new()))
            .await;
        assert!(block.starts_with("<p>Unknown command"));
        assert!(block.contains("&lt;script&gt;"));
        assert!(!block.contains("<script>"));
    }

    #[tokio::test]
    async fn test_render_block_reports_run_failures() {
        let block = CommandRenderer::new()
            .render_block(
                "/web meta\nurl = \"https://down.example/\"",
                &ctx(FakeBackend::new()),
            )
            .await;
        assert!(block.starts_with("<p>Request to https://down.example/ failed with status 404"));
    }

    #[tokio::test]
    async fn test_render_block_reports_network_failures() {
        let backend = FailingBackend {
            message: "connection refused".to_string(),
        };
        let block = CommandRenderer::new()
            .render_block(
                "/web meta\nurl = \"https://down.example/\"",
                &ExecutionContext::new(Arc::new(backend)),
            )
            .await;
        assert!(block.starts_with("<p>"));
        assert!(block.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_render_block_hides_variables_in_decode_errors() {
        let renderer = CommandRenderer::new()
            .with_variables(ParamVariables::new().with_github_oauth_token("gho_abc"));
        let source = "/graphql\nendpoint = \"https://api.github.com/graphql\"\nquery = \"{ a }\"\n[headers]\nAuthorization = \"Bearer {{ github_oauth_token }}\" trailing";

        let block = renderer.render_block(source, &ctx(FakeBackend::new())).await;

        assert!(block.starts_with("<p>Invalid parameters for /graphql (line 4)"));
        assert!(!block.contains("gho_abc"));
    }

    #[tokio::test]
    async fn test_execute_redacts_variables_in_run_errors() {
        let backend = FailingBackend {
            message: "refused for https://x.example/gho_abc".to_string(),
        };
        let renderer = CommandRenderer::new()
            .with_variables(ParamVariables::new().with_github_oauth_token("gho_abc"));

        let err = renderer
            .execute(
                "/web meta\nurl = \"https://x.example/{{ github_oauth_token }}\"",
                &ExecutionContext::new(Arc::new(backend)),
            )
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("<redacted>"));
        assert!(!message.contains("gho_abc"));
    }

    #[test]
    fn test_rendered_command_serializes_camel_case() {
        let rendered = RenderedCommand {
            html: "<b>x</b>".to_string(),
            plain_text: "x".to_string(),
            wants_full_width: true,
        };
        assert_eq!(
            serde_json::to_value(&rendered).unwrap(),
            serde_json::json!({"html": "<b>x</b>", "plainText": "x", "wantsFullWidth": true})
        );
    }
}
