//! Errors raised when a move cannot be applied.
//!
//! None of these are surfaced to the person chatting; the flow layer logs
//! them and drops the input.

use super::Position;

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game has already been resolved.
    #[display("Game is already over")]
    GameOver,

    /// The engine is busy thinking, cheating or settling a draw.
    #[display("Not accepting moves while {}", _0)]
    NotYourTurn(&'static str),
}

impl std::error::Error for MoveError {}
