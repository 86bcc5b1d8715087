//! BoardBench CLI - Command-line interface
//!
//! Commands:
//! - run: Play a match (or a series) between two agents
//! - list-games: Show available games
//! - list-agents: Show available agent types

mod catalog;
mod list_cmd;
mod run_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use run_cmd::RunArgs;

#[derive(Parser)]
#[command(name = "boardbench")]
#[command(about = "Benchmark game-playing agents on classic board games")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a match between two agents
    Run(RunArgs),
    /// List available games
    ListGames,
    /// List available agent types
    ListAgents,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run(args) => args.log_level(),
        Commands::ListGames | Commands::ListAgents => "warn",
    };
    init_tracing(default_level);

    match cli.command {
        Commands::Run(args) => run_cmd::run(args),
        Commands::ListGames => {
            list_cmd::list_games();
            Ok(())
        }
        Commands::ListAgents => {
            list_cmd::list_agents();
            Ok(())
        }
    }
}

/// Log to stderr; RUST_LOG overrides the flag-derived level
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
