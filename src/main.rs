//! Valentine Flow - terminal chat
//!
//! Runs the scripted conversation, or just its rigged game, in a terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use valentine_flow::{FlowConfig, Pacing, tui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Chat {
            config,
            seed,
            speed,
            log_file,
        } => {
            let mut config = FlowConfig::load_or_default(&config)?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(speed) = speed {
                config = config.with_pacing(Pacing { speed });
            }
            if let Some(log_file) = log_file {
                config = config.with_log_file(log_file);
            }
            tui::run_chat(config).await
        }
        Command::Game { seed, log_file } => {
            let mut config = FlowConfig::default();
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(log_file) = log_file {
                config = config.with_log_file(log_file);
            }
            tui::run_game(config).await
        }
    }
}
