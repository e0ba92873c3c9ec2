//! Subcommands of the `collected` binary.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a command and print its sanitized HTML
    ///
    /// The command text comes from SOURCE, --file, or stdin, in that order.
    Run {
        /// Command text, e.g. "/color #ff8800"
        #[arg(conflicts_with = "file")]
        source: Option<String>,
        /// Read the command text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Print the plain text form instead of HTML
        #[arg(long)]
        plain: bool,
        /// Print the HTML without sanitizing it (trusted results only)
        #[arg(long, conflicts_with = "plain")]
        raw: bool,
    },

    /// Parse a command and print what it would do as JSON
    Parse {
        /// Command text
        #[arg(conflicts_with = "file")]
        source: Option<String>,
        /// Read the command text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Serve the command API over HTTP
    Serve {
        /// Port to listen on (defaults to COLLECTED_PORT or 9878)
        #[arg(short, long)]
        port: Option<u16>,
        /// Allowed CORS origin; repeat for several. All origins when omitted.
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },
}
