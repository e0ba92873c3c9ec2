//! Request bodies for the command API.

use std::collections::BTreeMap;

use collected_core::ParamVariables;
use serde::Deserialize;

/// Body of `POST /api/commands/render` and `POST /api/commands/parse`.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Full command text, starting with the slash line.
    pub source: String,
    /// `{{name}}` values for this request. The server adds none of its own.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl CommandRequest {
    pub fn variables(&self) -> ParamVariables {
        ParamVariables::from(self.variables.clone())
    }
}
