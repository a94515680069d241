//! Valentine Flow library - a scripted chat with a rigged game
//!
//! A fixed conversation is walked one node at a time. Branches are
//! one-shot choice sets, and two embedded sub-flows (a tic-tac-toe game the
//! person can never win, and a heart-tapping challenge) always rejoin the
//! main line at the same question.
//!
//! # Architecture
//!
//! - **Games**: board, rules, move policy and the rigged [`GameEngine`]
//! - **Script**: the conversation as data ([`Script`], [`ScriptNode`], [`ChoiceSet`])
//! - **Flow**: [`FlowController`] and its [`FlowSession`] context
//! - **Ports**: [`PresentationPort`] and [`EffectsPort`], injected into the flow
//! - **TUI**: ratatui adapters for both ports and a key reader
//!
//! # Example
//!
//! ```no_run
//! use valentine_flow::{ChromeFeatures, FlowConfig, FlowController, script};
//! use valentine_flow::recording::{Autopilot, RecordingEffects, RecordingPresenter};
//!
//! # async fn example() {
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let presenter = RecordingPresenter::new(ChromeFeatures::all())
//!     .with_autopilot(Autopilot::new(tx));
//! let mut controller = FlowController::new(
//!     script::valentine::script(),
//!     presenter,
//!     RecordingEffects::new(),
//!     rx,
//!     &FlowConfig::default(),
//! );
//! let transcript = controller.run().await;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod flow;
mod games;
mod ports;

// Public modules
pub mod script;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ConfigError, FlowConfig, HeartConfig, Pacing};

// Crate-level exports - Flow runtime
pub use flow::{
    Deferred, DeferredQueue, Ending, FLOATING_HEARTS, FlowController, FlowSession, FlowState,
    Transcript,
};

// Crate-level exports - Ports
pub use ports::{
    Anchor, CellFx, ChromeEvent, ChromeFeatures, ChromeFx, EffectsPort, ElementId, InputPrompt,
    PresentationPort, UserInput, recording, release,
};

// Crate-level exports - Script types
pub use script::{
    ArmedChoices, Choice, ChoiceAction, ChoiceLatch, ChoiceSet, ChoiceSetId, Cue, NodeId, Script,
    ScriptMessage, ScriptNode, Sender, SubFlow, Successor,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    AiMove, AiTurn, Board, DrawFix, Followup, GameEngine, GameOutcome, GamePhase, HumanTurn,
    Interception, Mark, MoveError, OutcomePolicy, Position, ReportedOutcome, Resolution, Square,
    StatusLine,
};

/// Pure tic-tac-toe rules.
pub mod rules {
    pub use crate::games::tictactoe::rules::{
        LINES, check_winner, find_winning_move, is_full, winning_line,
    };
    pub use crate::games::tictactoe::engine::{outcome_of, steal_target};
}
