//! CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use collected_cli::handlers::run::OutputMode;
use collected_cli::input::read_source;
use collected_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers, log_filter};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(io::stderr)
        .init();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::from_env()?;

    match command {
        Commands::Run {
            source,
            file,
            plain,
            raw,
        } => {
            let source = read_source(source, file.as_deref(), io::stdin())?;
            let ctx = bootstrap(config)?;
            handlers::run::execute(&ctx, &source, OutputMode::from_flags(plain, raw)).await
        }
        Commands::Parse { source, file } => {
            let source = read_source(source, file.as_deref(), io::stdin())?;
            let ctx = bootstrap(config)?;
            handlers::parse::execute(&ctx, &source)
        }
        Commands::Serve {
            port,
            allowed_origins,
        } => Ok(handlers::serve::execute(&config, port, allowed_origins).await?),
    }
}
