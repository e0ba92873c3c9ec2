//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Run Collected slash commands from the terminal, or serve them over HTTP.
#[derive(Parser)]
#[command(name = "collected")]
#[command(about = "Parse, run and serve Collected slash commands")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
