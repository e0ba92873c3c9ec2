//! `/graphql`: run a query against a remote endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::{ParseError, ParseResult, RunError, RunResult};
use crate::html::escape_html;
use crate::ports::HttpRequest;
use crate::result::CommandResult;

use super::{Command, CommandParams, params};

/// Parse a bare `/graphql`.
pub fn parse(subcommands: &[&str], params: &str) -> ParseResult<Command> {
    match subcommands {
        [] => GraphQlRemoteQueryCommand::parse(params).map(Command::GraphQlRemoteQuery),
        _ => Err(ParseError::UnknownSubcommand {
            family: "graphql",
            subcommands: subcommands.iter().map(ToString::to_string).collect(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlRemoteQueryCommand {
    pub endpoint: String,
    pub query: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl GraphQlRemoteQueryCommand {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("graphql", params)?;
        params::require_url("endpoint", &cmd.endpoint)?;
        Ok(cmd)
    }

    pub fn params(&self) -> Option<CommandParams> {
        CommandParams::from_serialize(&Self {
            headers: params::redact_headers(&self.headers),
            ..self.clone()
        })
    }

    /// POST `{"query": ...}` and show the response JSON pretty-printed.
    ///
    /// The response is re-encoded from a parsed value and escaped, so the
    /// result is trusted even though the endpoint is arbitrary.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        let endpoint =
            params::require_url("endpoint", &self.endpoint).map_err(|err| RunError::InvalidCommand {
                message: err.to_string(),
            })?;

        let body = serde_json::to_vec(&json!({ "query": self.query }))?;
        let mut request = HttpRequest::post(endpoint, body)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");
        for (name, value) in &self.headers {
            request = request.with_header(name.as_str(), value.as_str());
        }

        let response = ctx.send_expecting_success(request).await?;
        let value: serde_json::Value = serde_json::from_slice(&response.body)?;
        let pretty = serde_json::to_string_pretty(&value)?;
        debug!(endpoint = %self.endpoint, bytes = response.body.len(), "GraphQL query answered");

        let html = format!(
            r#"<pre class="whitespace-pre-wrap break-words">{}</pre>"#,
            escape_html(&pretty)
        );
        Ok(CommandResult::dangerous_from_trusted_html(html).with_plain_text(pretty))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::HttpMethod;
    use crate::testing::FakeBackend;

    const PARAMS: &str = r#"endpoint = "https://api.example.com/graphql"
query = "{ viewer { login } }"

[headers]
Authorization = "Bearer abc"
"#;

    #[test]
    fn test_parse() {
        let cmd = GraphQlRemoteQueryCommand::parse(PARAMS).unwrap();
        assert_eq!(cmd.endpoint, "https://api.example.com/graphql");
        assert_eq!(cmd.query, "{ viewer { login } }");
        assert_eq!(cmd.headers["Authorization"], "Bearer abc");
    }

    #[test]
    fn test_parse_headers_optional() {
        let cmd = GraphQlRemoteQueryCommand::parse(
            "endpoint = \"https://api.example.com/graphql\"\nquery = \"{ a }\"",
        )
        .unwrap();
        assert!(cmd.headers.is_empty());
    }

    #[test]
    fn test_parse_requires_query() {
        assert!(matches!(
            GraphQlRemoteQueryCommand::parse("endpoint = \"https://api.example.com/graphql\""),
            Err(ParseError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_subcommands() {
        assert!(matches!(
            parse(&["mutate"], PARAMS),
            Err(ParseError::UnknownSubcommand { family: "graphql", .. })
        ));
    }

    #[tokio::test]
    async fn test_run_posts_query_with_headers() {
        let backend = Arc::new(FakeBackend::new().with_json(
            "api.example.com",
            &json!({"data": {"viewer": {"login": "<octocat>"}}}),
        ));
        let ctx = ExecutionContext::new(backend.clone());
        let cmd = GraphQlRemoteQueryCommand::parse(PARAMS).unwrap();

        let result = cmd.run(&ctx).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        let sent: serde_json::Value =
            serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"query": "{ viewer { login } }"}));

        assert!(result.dangerous_html_is_safe());
        let html = result.unsafe_html();
        assert!(html.starts_with(r#"<pre class="whitespace-pre-wrap break-words">{"#));
        assert!(html.contains("&lt;octocat&gt;"));
        assert!(!html.contains("<octocat>"));
        assert!(result.plain_text().contains("\n  \"data\": {"));
    }

    #[tokio::test]
    async fn test_run_rejects_non_json() {
        let ctx = ExecutionContext::new(Arc::new(
            FakeBackend::new().with_text("api.example.com", 200, "<html>oops</html>"),
        ));
        let cmd = GraphQlRemoteQueryCommand::parse(PARAMS).unwrap();

        let err = cmd.run(&ctx).await.unwrap_err();
        assert!(matches!(err, RunError::Json(_)));
    }

    #[tokio::test]
    async fn test_run_surfaces_status() {
        let ctx = ExecutionContext::new(Arc::new(
            FakeBackend::new().with_text("api.example.com", 500, "{}"),
        ));
        let cmd = GraphQlRemoteQueryCommand::parse(PARAMS).unwrap();

        let err = cmd.run(&ctx).await.unwrap_err();
        assert!(matches!(err, RunError::HttpStatus { status: 500, .. }));
    }
}
