mod add;
mod changes;
mod cli;
mod context;
mod cut_off;
mod error;
mod merge;
mod progress;
mod ui;
mod versions;

use clap::Parser;
use cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());

    let result = match cli.command {
        Commands::Versions { args } => versions::execute(args),
        Commands::Changes {
            from,
            to,
            json,
            args,
        } => changes::execute(from, to, json, args),
        Commands::Add {
            change_type,
            message,
            pull_requests,
            authors,
            version,
            group,
            args,
        } => add::execute(
            change_type,
            message,
            pull_requests,
            authors,
            version,
            group,
            args,
        ),
        Commands::CutOff { version, args } => cut_off::execute(version, args),
        Commands::Merge {
            into,
            patterns,
            args,
        } => merge::execute(into, patterns, args),
    };

    if let Err(err) = result {
        ui::error_message(&format!("Error: {}", err.user_message()));
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
