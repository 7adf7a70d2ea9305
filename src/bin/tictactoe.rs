//! Tic-tac-toe TD learning CLI
//!
//! This CLI provides:
//! - Self-play training of two value agents
//! - Terminal play against a trained policy
//! - Inspection of saved policies

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(version, about = "Self-play temporal difference learning for N×N tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train two agents against each other
    Train(Box<tictactoe_td::cli::commands::train::TrainArgs>),

    /// Play against a trained policy
    Play(tictactoe_td::cli::commands::play::PlayArgs),

    /// Show statistics about a saved policy
    Inspect(tictactoe_td::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tictactoe_td::cli::commands::train::execute(*args),
        Commands::Play(args) => tictactoe_td::cli::commands::play::execute(args),
        Commands::Inspect(args) => tictactoe_td::cli::commands::inspect::execute(args),
    }
}
