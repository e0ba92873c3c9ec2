//! The `collected` command-line tool.
//!
//! Runs slash commands locally (`run`, `parse`) or serves them over HTTP
//! (`serve`). Configuration comes from `COLLECTED_*` and `AWS_*` environment
//! variables, optionally loaded from a `.env` file.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod input;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap, log_filter};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
