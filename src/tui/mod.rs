//! Terminal front end for the conversation.

mod input;
mod terminal;
mod ui;
mod view;

pub use input::{KeyAction, map_key, move_cursor};
pub use terminal::{Screen, SharedScreen, TerminalEffects, TerminalPresenter, spawn_key_reader};
pub use view::{BoardView, ChatView, Entry, HeartView};

use crate::config::FlowConfig;
use crate::flow::{Ending, FlowController, FlowSession};
use crate::script::valentine;
use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::Path;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument};

type TerminalScreen = SharedScreen<CrosstermBackend<Stdout>>;

/// Sends tracing output to `path` so it never lands on the chat screen.
pub fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

/// Runs the whole conversation in the terminal, then celebrates until the
/// person quits.
#[instrument(skip_all, fields(seed = ?config.seed()))]
pub async fn run_chat(config: FlowConfig) -> Result<()> {
    init_logging(config.log_file())?;
    info!("Starting Valentine chat");

    let screen = enter_screen()?;
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (quit_tx, mut quit_rx) = oneshot::channel();
    let reader = spawn_key_reader(screen.clone(), input_tx, quit_tx);

    let mut controller = FlowController::new(
        valentine::script(),
        TerminalPresenter::new(screen.clone()),
        TerminalEffects::new(screen.clone()),
        input_rx,
        &config,
    );

    tokio::select! {
        transcript = async {
            let transcript = controller.run().await;
            if transcript.ending == Ending::Celebrated {
                controller.idle().await;
            }
            transcript
        } => {
            info!(ending = %transcript.ending, visited = ?transcript.visited, "conversation over");
        }
        _ = &mut quit_rx => info!("User quit"),
    }

    drop(controller);
    leave_screen(&screen)?;
    if reader.join().is_err() {
        error!("key reader panicked");
    }
    Ok(())
}

/// Plays just the rigged game in the terminal.
#[instrument(skip_all, fields(seed = ?config.seed()))]
pub async fn run_game(config: FlowConfig) -> Result<()> {
    init_logging(config.log_file())?;
    info!("Starting standalone game");

    let screen = enter_screen()?;
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (quit_tx, mut quit_rx) = oneshot::channel();
    let reader = spawn_key_reader(screen.clone(), input_tx, quit_tx);

    let mut session = FlowSession::new(
        TerminalPresenter::new(screen.clone()),
        TerminalEffects::new(screen.clone()),
        input_rx,
        &config,
    );

    let outcome = tokio::select! {
        outcome = session.play_tictactoe() => outcome,
        _ = &mut quit_rx => None,
    };

    drop(session);
    leave_screen(&screen)?;
    if reader.join().is_err() {
        error!("key reader panicked");
    }

    match outcome {
        Some(outcome) => println!("Reported outcome: {outcome}"),
        None => println!("Game abandoned."),
    }
    Ok(())
}

fn enter_screen() -> Result<TerminalScreen> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let screen = Screen::shared(terminal);
    screen
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .redraw();
    Ok(screen)
}

fn leave_screen(screen: &TerminalScreen) -> Result<()> {
    let mut screen = screen
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    disable_raw_mode()?;
    execute!(screen.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    screen.terminal_mut().show_cursor()?;
    Ok(())
}
