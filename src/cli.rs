//! Command-line interface for valentine_flow.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Valentine Flow - a scripted chat that will not take no for an answer
#[derive(Parser, Debug)]
#[command(name = "valentine_flow")]
#[command(about = "Scripted Valentine chat with a rigged tic-tac-toe game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full conversation in the terminal
    Chat {
        /// Path to the TOML config file (defaults apply if it doesn't exist)
        #[arg(short, long, default_value = "valentine_flow.toml")]
        config: PathBuf,

        /// Seed for every random choice
        #[arg(long)]
        seed: Option<u64>,

        /// Pacing multiplier; 2.0 halves every delay, 0 removes them
        #[arg(long)]
        speed: Option<f64>,

        /// Where to write logs
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Play only the rigged tic-tac-toe game
    Game {
        /// Seed for the system's moves
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write logs
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}
