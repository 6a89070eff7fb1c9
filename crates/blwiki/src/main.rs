//! blwiki CLI - mirror Markdown documents onto a Backlog wiki.
//!
//! Provides commands for:
//! - `sync`: Reconcile the documents directory with the project's wiki
//! - `check-config`: Show the resolved configuration

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckConfigArgs, SyncArgs};
use output::Output;

/// blwiki - Markdown to Backlog wiki synchronizer.
#[derive(Parser)]
#[command(name = "blwiki", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, update and optionally delete wiki pages to match local documents.
    Sync(SyncArgs),
    /// Load and validate configuration, then print it.
    CheckConfig(CheckConfigArgs),
}

fn main() {
    // Values from `.env` feed the clap `env` fallbacks; real variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Sync(args) if args.verbose);

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to INFO
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(),
        Commands::CheckConfig(args) => args.execute(),
    };

    if let Err(err) = result {
        output.fatal(&err);
        std::process::exit(1);
    }
}
