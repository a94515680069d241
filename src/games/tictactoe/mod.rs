//! Rigged tic-tac-toe: board, rules, move policy and engine.

mod action;
pub mod engine;
mod phases;
mod policy;
mod position;
pub mod rules;
mod types;

pub use action::MoveError;
pub use engine::{AiMove, AiTurn, DrawFix, Followup, GameEngine, HumanTurn, Interception};
pub use phases::{GameOutcome, GamePhase, ReportedOutcome, Resolution, StatusLine};
pub use policy::OutcomePolicy;
pub use position::Position;
pub use types::{Board, Mark, Square};
