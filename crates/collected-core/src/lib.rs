//! Slash-command language for Collected posts.
//!
//! A command is a header line naming the command, optionally followed by a
//! TOML parameter block:
//!
//! ```text
//! /web snippet
//! url = "https://example.com/post"
//! selector = "article p"
//! ```
//!
//! [`parse_command_input`] turns that text into a [`Command`], which runs
//! against an [`ExecutionContext`] and produces a [`CommandResult`]. Results
//! are either trusted HTML the command built itself or untrusted markup;
//! [`safe_html_for_command_result`] is the single gateway that decides which
//! HTML reaches a browser. [`CommandRenderer`] wires the three steps together.
//!
//! Outbound HTTP goes through the [`HttpBackend`] port. The production
//! implementation lives in `collected-http`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod commands;
pub mod context;
pub mod error;
pub mod html;
pub mod ports;
pub mod render;
pub mod result;
pub mod sanitize;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use commands::{
    AwsS3Command, AwsS3ObjectCommand, Color, ColorCommand, ColorGradientCommand, Command,
    CommandParams, CommandSummary, FAMILIES, GraphQlRemoteQueryCommand, GraphiqlMainCommand, ParamVariables,
    WebMetaCommand, WebSnippetCommand, parse_command, parse_command_input,
};
pub use context::{AwsCredentials, ExecutionContext};
pub use error::{CommandError, ParseError, ParseResult, RunError, RunResult};
pub use ports::{HttpBackend, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResult};
pub use render::{CommandRenderer, RenderedCommand};
pub use result::{CommandResult, HtmlTrust};
pub use sanitize::{HtmlSanitizer, UgcSanitizer, safe_html_for_command_result};
pub use settings::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_SERVER_PORT, Settings,
    SettingsError, validate_settings,
};
