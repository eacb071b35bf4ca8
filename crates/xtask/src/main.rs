//! Development tasks for the combat engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, ReadEvents, Replay, Sessions, Simulate};
use tracing_subscriber::EnvFilter;

/// Development tasks for the combat engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the combat engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scripted combat scenario and save its logs
    Simulate(Simulate),

    /// Read and inspect a saved event log
    ReadEvents(ReadEvents),

    /// Re-execute a saved command log and verify state roots
    Replay(Replay),

    /// List saved sessions
    Sessions(Sessions),

    /// Remove saved sessions
    Clean(Clean),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SAVE_DATA_DIR and CONTENT_DATA_DIR)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::ReadEvents(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
        Command::Sessions(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
    }
}
