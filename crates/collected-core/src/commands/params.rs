//! Parameter block decoding and introspection.
//!
//! Parameter blocks are TOML: `key = "value"` lines, with tables for maps
//! such as `[headers]`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::ParamVariables;
use crate::error::{ParseError, ParseResult};

const REDACTED: &str = "<redacted>";

/// Decode `params` into a command's parameter struct.
///
/// The error keeps the decoder's message and line, not the offending text.
pub fn decode<T: DeserializeOwned>(command: &str, params: &str) -> ParseResult<T> {
    toml::from_str(params).map_err(|err| {
        let line = err
            .span()
            .and_then(|span| params.get(..span.start))
            .map(|before| before.matches('\n').count() + 1);
        ParseError::InvalidParams {
            command: command.to_string(),
            message: err.message().to_string(),
            line,
        }
    })
}

/// Check that a URL-typed parameter is an absolute URL.
pub fn require_url(field: &'static str, value: &str) -> ParseResult<Url> {
    Url::parse(value).map_err(|source| ParseError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

/// Header maps with their values replaced, for introspection output.
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|key| (key.clone(), REDACTED.to_string()))
        .collect()
}

/// A command's parameters as reported by introspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommandParams(serde_json::Value);

impl CommandParams {
    pub(crate) fn from_serialize(value: &impl Serialize) -> Option<Self> {
        serde_json::to_value(value).ok().map(Self)
    }

    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Parameters encoded as a JSON string.
    pub fn json_encoded(&self) -> String {
        self.0.to_string()
    }

    /// Replace every string value that contains a substituted variable.
    #[must_use]
    pub fn redact_variables(mut self, variables: &ParamVariables) -> Self {
        if !variables.is_empty() {
            redact_strings(&mut self.0, variables);
        }
        self
    }
}

fn redact_strings(value: &mut serde_json::Value, variables: &ParamVariables) {
    match value {
        serde_json::Value::String(text) if variables.appears_in(text) => {
            *text = REDACTED.to_string();
        }
        serde_json::Value::Array(items) => {
            for item in items {
                redact_strings(item, variables);
            }
        }
        serde_json::Value::Object(fields) => {
            for field in fields.values_mut() {
                redact_strings(field, variables);
            }
        }
        _ => {}
    }
}

/// What a parsed command would do, without running it.
///
/// Serialized by the `parse` surfaces of the CLI and the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSummary {
    pub family: &'static str,
    pub path: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<CommandParams>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Example {
        url: String,
        selector: Option<String>,
        #[serde(default)]
        headers: BTreeMap<String, String>,
    }

    #[test]
    fn test_decode_required_and_optional_fields() {
        let example: Example = decode(
            "web snippet",
            "url = \"https://example.com\"\nselector = \"main\"\n",
        )
        .unwrap();
        assert_eq!(example.url, "https://example.com");
        assert_eq!(example.selector.as_deref(), Some("main"));
        assert!(example.headers.is_empty());
    }

    #[test]
    fn test_decode_header_table() {
        let example: Example = decode(
            "graphql",
            "url = \"https://example.com\"\n[headers]\nAuthorization = \"Bearer t\"\n",
        )
        .unwrap();
        assert_eq!(example.headers["Authorization"], "Bearer t");
    }

    #[test]
    fn test_decode_missing_field_names_command() {
        let err = decode::<Example>("web snippet", "selector = \"main\"").unwrap_err();
        assert!(matches!(err, ParseError::InvalidParams { .. }));
        let msg = err.to_string();
        assert!(msg.contains("/web snippet"));
        assert!(msg.contains("url"));
    }

    #[test]
    fn test_decode_malformed_block() {
        let err = decode::<Example>("web meta", "url = ").unwrap_err();
        assert!(matches!(err, ParseError::InvalidParams { .. }));
    }

    #[test]
    fn test_decode_error_does_not_quote_block() {
        let block = "url = \"https://example.com\"\n[headers]\nAuthorization = \"Bearer gho_abc\" junk\n";
        let err = decode::<Example>("graphql", block).unwrap_err();
        assert!(matches!(err, ParseError::InvalidParams { line: Some(3), .. }));
        assert!(!err.to_string().contains("gho_abc"));
    }

    #[test]
    fn test_redact_variables_replaces_touched_values() {
        let vars = ParamVariables::new().with_github_oauth_token("gho_abc");
        let params = CommandParams(serde_json::json!({
            "url": "https://x.example/gho_abc",
            "selector": "main",
            "nested": {"list": ["Bearer gho_abc", "plain"]},
        }))
        .redact_variables(&vars);

        let value = params.as_value();
        assert_eq!(value["url"], "<redacted>");
        assert_eq!(value["selector"], "main");
        assert_eq!(value["nested"]["list"][0], "<redacted>");
        assert_eq!(value["nested"]["list"][1], "plain");
    }

    #[test]
    fn test_require_url_rejects_relative() {
        assert!(require_url("url", "https://example.com/a").is_ok());
        let err = require_url("url", "/relative").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { field: "url", .. }));
    }

    #[test]
    fn test_redact_headers_keeps_names() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "Bearer secret".to_string());
        let redacted = redact_headers(&headers);
        assert_eq!(redacted["Authorization"], "<redacted>");
    }
}
