//! Full-board detection for tic-tac-toe.

use super::super::{Board, Square};

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner would be a draw, which the engine never reports.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}
