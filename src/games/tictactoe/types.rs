//! Core domain types for the rigged tic-tac-toe board.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Which side owns a mark on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// The person chatting (plays X).
    #[strum(to_string = "X")]
    Human,
    /// The scripted side of the conversation (plays O).
    #[strum(to_string = "O")]
    System,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Human => Mark::System,
            Mark::System => Mark::Human,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark occupying this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from a row-major layout, mostly useful in tests.
    ///
    /// `'X'` is a human mark, `'O'` a system mark, anything else is empty.
    pub fn from_layout(layout: &str) -> Self {
        let mut board = Self::new();
        for (pos, ch) in Position::ALL.iter().zip(layout.chars().filter(|c| !c.is_whitespace())) {
            let square = match ch {
                'X' | 'x' => Square::Occupied(Mark::Human),
                'O' | 'o' => Square::Occupied(Mark::System),
                _ => Square::Empty,
            };
            board.set(*pos, square);
        }
        board
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Positions that are still empty, in board order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::valid_moves(self)
    }

    /// Positions holding the given mark, in board order.
    pub fn positions_of(&self, mark: Mark) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.get(*pos) == Square::Occupied(mark))
            .collect()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based key so the terminal can prompt with it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
