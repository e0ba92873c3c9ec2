//! The command model.
//!
//! A [`Command`] is a closed set of variants, one per family/subcommand
//! pair. Each variant owns the decoded parameters it needs and nothing
//! else; running it never mutates it, so a command may be run again.
//!
//! Text enters through [`parse_command_input`], which tokenizes the header
//! line and routes it to the family parser.

pub mod aws;
pub mod color;
pub mod graphiql;
pub mod graphql;
mod input;
pub mod params;
mod variables;
pub mod web;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::RunResult;
use crate::result::CommandResult;

pub use aws::{AwsS3Command, AwsS3ObjectCommand};
pub use color::{Color, ColorCommand, ColorGradientCommand};
pub use graphiql::GraphiqlMainCommand;
pub use graphql::GraphQlRemoteQueryCommand;
pub use input::{FAMILIES, parse_command, parse_command_input};
pub use params::{CommandParams, CommandSummary};
pub use variables::ParamVariables;
pub use web::{WebMetaCommand, WebSnippetCommand};

/// A parsed, ready-to-run command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/color <hex>`
    Color(ColorCommand),
    /// `/color gradient`
    ColorGradient(ColorGradientCommand),
    /// `/web snippet`
    WebSnippet(WebSnippetCommand),
    /// `/web meta`
    WebMeta(WebMetaCommand),
    /// `/aws s3`
    AwsS3(AwsS3Command),
    /// `/aws s3 object`
    AwsS3Object(AwsS3ObjectCommand),
    /// `/graphql`
    GraphQlRemoteQuery(GraphQlRemoteQueryCommand),
    /// `/graphiql`
    GraphiqlMain(GraphiqlMainCommand),
}

impl Command {
    /// Run the command once against `ctx`.
    ///
    /// Fails fast when the context is already cancelled or past its deadline.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        ctx.check()?;
        debug!(command = ?self.path(), "Running command");

        match self {
            Self::Color(cmd) => Ok(cmd.run()),
            Self::ColorGradient(cmd) => Ok(cmd.run()),
            Self::WebSnippet(cmd) => cmd.run(ctx).await,
            Self::WebMeta(cmd) => cmd.run(ctx).await,
            Self::AwsS3(cmd) => cmd.run(ctx).await,
            Self::AwsS3Object(cmd) => cmd.run(ctx).await,
            Self::GraphQlRemoteQuery(cmd) => cmd.run(ctx).await,
            Self::GraphiqlMain(cmd) => cmd.run(),
        }
    }

    /// The top-level token that selects this command's family.
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Color(_) | Self::ColorGradient(_) => "color",
            Self::WebSnippet(_) | Self::WebMeta(_) => "web",
            Self::AwsS3(_) | Self::AwsS3Object(_) => "aws",
            Self::GraphQlRemoteQuery(_) => "graphql",
            Self::GraphiqlMain(_) => "graphiql",
        }
    }

    /// The fixed tokens that name this command, family first.
    ///
    /// `/color <hex>` reports `["color"]`; the hex literal is a parameter.
    pub fn path(&self) -> Vec<&'static str> {
        match self {
            Self::Color(_) => vec!["color"],
            Self::ColorGradient(_) => vec!["color", "gradient"],
            Self::WebSnippet(_) => vec!["web", "snippet"],
            Self::WebMeta(_) => vec!["web", "meta"],
            Self::AwsS3(_) => vec!["aws", "s3"],
            Self::AwsS3Object(_) => vec!["aws", "s3", "object"],
            Self::GraphQlRemoteQuery(_) => vec!["graphql"],
            Self::GraphiqlMain(_) => vec!["graphiql"],
        }
    }

    /// The subcommand tokens the command was parsed from, when known.
    pub fn subcommands(&self) -> Option<Vec<String>> {
        match self {
            Self::Color(cmd) => Some(vec![cmd.input.clone()]),
            Self::ColorGradient(_) | Self::WebSnippet(_) | Self::WebMeta(_) => Some(
                self.path()
                    .iter()
                    .skip(1)
                    .map(ToString::to_string)
                    .collect(),
            ),
            Self::GraphQlRemoteQuery(_) | Self::GraphiqlMain(_) => Some(Vec::new()),
            Self::AwsS3(_) | Self::AwsS3Object(_) => None,
        }
    }

    /// The decoded parameters, for introspection. Header values are redacted.
    pub fn params(&self) -> Option<CommandParams> {
        match self {
            Self::Color(cmd) => CommandParams::from_serialize(cmd),
            Self::ColorGradient(cmd) => CommandParams::from_serialize(cmd),
            Self::WebSnippet(cmd) => CommandParams::from_serialize(cmd),
            Self::WebMeta(cmd) => CommandParams::from_serialize(cmd),
            Self::AwsS3(_) | Self::AwsS3Object(_) => None,
            Self::GraphQlRemoteQuery(cmd) => cmd.params(),
            Self::GraphiqlMain(cmd) => cmd.params(),
        }
    }

    /// Introspection record for this command.
    ///
    /// Any parameter value containing one of `variables` is redacted, since
    /// substituted values are usually credentials.
    pub fn summary(&self, variables: &ParamVariables) -> CommandSummary {
        CommandSummary {
            family: self.family(),
            path: self.path(),
            subcommands: self.subcommands(),
            params: self.params().map(|params| params.redact_variables(variables)),
        }
    }
}
