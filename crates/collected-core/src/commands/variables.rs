//! Host-supplied values substituted into parameter blocks.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::error::{ParseError, ParseResult};

const PLACEHOLDER: &str = r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}";

/// Named values for `{{ name }}` placeholders in a parameter block.
///
/// Substitution happens before the block is decoded, so a placeholder sits
/// inside a quoted TOML string. Values are escaped as basic-string content
/// and cannot close the string they land in:
///
/// ```text
/// [headers]
/// Authorization = "Bearer {{ github_oauth_token }}"
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParamVariables {
    values: BTreeMap<String, String>,
}

impl ParamVariables {
    /// Variable holding the signed-in user's GitHub OAuth token.
    pub const GITHUB_OAUTH_TOKEN: &'static str = "github_oauth_token";

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_github_oauth_token(self, token: impl Into<String>) -> Self {
        self.with(Self::GITHUB_OAUTH_TOKEN, token)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn github_oauth_token(&self) -> Option<&str> {
        self.get(Self::GITHUB_OAUTH_TOKEN)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `text` contains any non-empty value, raw or escaped.
    pub fn appears_in(&self, text: &str) -> bool {
        self.needles().any(|needle| text.contains(needle.as_str()))
    }

    /// `text` with every value replaced by `<redacted>`.
    pub fn redact(&self, text: &str) -> String {
        let mut needles: Vec<String> = self.needles().collect();
        // Longest first so a value never leaves a tail of a longer one.
        needles.sort_by_key(|needle| std::cmp::Reverse(needle.len()));
        needles
            .iter()
            .fold(text.to_string(), |acc, needle| acc.replace(needle.as_str(), REDACTED))
    }

    fn needles(&self) -> impl Iterator<Item = String> + '_ {
        self.values
            .values()
            .filter(|value| !value.is_empty())
            .flat_map(|value| {
                let escaped = escape_basic_string(value);
                let both = if escaped == *value {
                    vec![value.clone()]
                } else {
                    vec![value.clone(), escaped]
                };
                both.into_iter()
            })
    }

    /// Replace every placeholder in `body`.
    ///
    /// Fails on the first placeholder naming a variable that was not set.
    /// Text that is not a placeholder is copied unchanged.
    pub fn preprocess(&self, body: &str) -> ParseResult<String> {
        let placeholder = Regex::new(PLACEHOLDER).map_err(|err| ParseError::Preprocess(Box::new(err)))?;

        let mut out = String::with_capacity(body.len());
        let mut copied = 0;
        for captures in placeholder.captures_iter(body) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value = self
                .get(name.as_str())
                .ok_or_else(|| ParseError::UnknownVariable {
                    name: name.as_str().to_string(),
                })?;

            out.push_str(&body[copied..whole.start()]);
            out.push_str(&escape_basic_string(value));
            copied = whole.end();
        }
        out.push_str(&body[copied..]);

        Ok(out)
    }
}

const REDACTED: &str = "<redacted>";

/// Escape `value` as the content of a TOML basic string.
fn escape_basic_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

impl From<BTreeMap<String, String>> for ParamVariables {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

// Values are usually tokens.
impl fmt::Debug for ParamVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
