//! Board positions for the rigged tic-tac-toe game.

use super::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board (0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Parses a 1-based key ("1".."9"), as typed in the terminal.
    #[instrument]
    pub fn from_key(s: &str) -> Option<Position> {
        match s.trim().parse::<usize>() {
            Ok(n) if (1..=9).contains(&n) => Self::from_index(n - 1),
            _ => None,
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row and column of this position, both 0-2.
    pub fn row_col(self) -> (usize, usize) {
        (self.to_index() / 3, self.to_index() % 3)
    }

    /// All 9 positions.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Filters positions by board state - returns only empty squares.
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
