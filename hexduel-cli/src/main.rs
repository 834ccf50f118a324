//! hexduel CLI - Command-line interface
//!
//! Commands:
//! - play: Play one game of Dodo or Gopher between two agents
//! - analyze: Search the starting position and report the chosen action

mod analyze;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexduel")]
#[command(about = "Minimax player for the Dodo and Gopher hex games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Find the best opening action
    Analyze(analyze::AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Analyze(args) => analyze::run(args),
    }
}
