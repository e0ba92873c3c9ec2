//! `/graphiql`: mount an embedded GraphQL console in the page.
//!
//! No request is made here. The result is a placeholder element plus a
//! script that queues a `renderGraphiqlForURL` task for the page's client
//! code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult, RunError, RunResult};
use crate::result::CommandResult;

use super::{Command, CommandParams, params};

/// DOM id of the console's mount point.
pub const MOUNT_ELEMENT_ID: &str = "collected-graphiql-command-result";

/// Parse a bare `/graphiql`.
pub fn parse(subcommands: &[&str], params: &str) -> ParseResult<Command> {
    match subcommands {
        [] => GraphiqlMainCommand::parse(params).map(Command::GraphiqlMain),
        _ => Err(ParseError::UnknownSubcommand {
            family: "graphiql",
            subcommands: subcommands.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// JSON that can sit inside a `<script>` element without closing it.
fn script_json(value: &impl Serialize) -> RunResult<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphiqlMainCommand {
    pub endpoint: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl GraphiqlMainCommand {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("graphiql", params)?;
        params::require_url("endpoint", &cmd.endpoint)?;
        Ok(cmd)
    }

    pub fn params(&self) -> Option<CommandParams> {
        CommandParams::from_serialize(&Self {
            headers: params::redact_headers(&self.headers),
            ..self.clone()
        })
    }

    /// Trusted and full width. Endpoint and headers are JSON-encoded for the
    /// script context, never interpolated raw.
    pub fn run(&self) -> RunResult<CommandResult> {
        params::require_url("endpoint", &self.endpoint).map_err(|err| RunError::InvalidCommand {
            message: err.to_string(),
        })?;

        let element_id = script_json(&MOUNT_ELEMENT_ID)?;
        let endpoint = script_json(&self.endpoint)?;
        let headers = script_json(&self.headers)?;

        let html = format!(
            r#"<div id="{MOUNT_ELEMENT_ID}" style="height: 1000px;"></div>
<script>
window.collectedTasks.push({{
	method: 'renderGraphiqlForURL',
	params: {{
		domElement: document.getElementById({element_id}),
		endpointURL: {endpoint},
		headers: {headers}
	}}
}})
</script>"#
        );

        Ok(CommandResult::dangerous_from_trusted_html(html).with_full_width(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cmd = GraphiqlMainCommand::parse(
            "endpoint = \"https://api.example.com/graphql\"\n[headers]\nX-Token = \"t\"",
        )
        .unwrap();
        assert_eq!(cmd.endpoint, "https://api.example.com/graphql");
        assert_eq!(cmd.headers["X-Token"], "t");
    }

    #[test]
    fn test_parse_requires_endpoint() {
        assert!(matches!(
            GraphiqlMainCommand::parse(""),
            Err(ParseError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_run_is_trusted_full_width_console() {
        let cmd = GraphiqlMainCommand::parse(
            "endpoint = \"https://api.example.com/graphql\"\n[headers]\nAuthorization = \"Bearer t\"",
        )
        .unwrap();

        let result = cmd.run().unwrap();
        assert!(result.dangerous_html_is_safe());
        assert!(result.wants_full_width());

        let html = result.unsafe_html();
        assert!(html.starts_with(
            r#"<div id="collected-graphiql-command-result" style="height: 1000px;"></div>"#
        ));
        assert!(html.contains("method: 'renderGraphiqlForURL'"));
        assert!(html.contains(r#"endpointURL: "https://api.example.com/graphql""#));
        assert!(html.contains(r#"headers: {"Authorization":"Bearer t"}"#));
        assert!(html.contains(r#"getElementById("collected-graphiql-command-result")"#));
    }

    #[test]
    fn test_run_cannot_break_out_of_script() {
        let cmd = GraphiqlMainCommand {
            endpoint: "https://api.example.com/</script><script>alert(1)</script>".to_string(),
            headers: BTreeMap::from([(
                "X".to_string(),
                "</script><img src=x onerror=alert(1)>".to_string(),
            )]),
        };

        let html = cmd.run().unwrap().unsafe_html().to_string();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_params_redact_headers() {
        let cmd = GraphiqlMainCommand::parse(
            "endpoint = \"https://api.example.com/graphql\"\n[headers]\nAuthorization = \"Bearer t\"",
        )
        .unwrap();
        let encoded = cmd.params().unwrap().json_encoded();
        assert!(encoded.contains("<redacted>"));
        assert!(!encoded.contains("Bearer"));
    }
}
