//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};
use tracing::instrument;

/// The eight three-in-a-row lines: rows, columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns the first completed line and the mark that completed it.
pub fn winning_line(board: &Board) -> Option<([Position; 3], Mark)> {
    LINES.into_iter().find_map(|line @ [a, b, c]| {
        let sq = board.get(a);
        match sq {
            Square::Occupied(mark) if sq == board.get(b) && sq == board.get(c) => Some((line, mark)),
            _ => None,
        }
    })
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if that mark has three in a row,
/// `None` otherwise.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_line(board).map(|(_, mark)| mark)
}

/// Finds an empty position that would immediately complete a line for `mark`.
///
/// Positions are tried in board order, so the lowest winning index wins ties.
pub fn find_winning_move(board: &Board, mark: Mark) -> Option<Position> {
    let mut scratch = board.clone();
    Position::valid_moves(board).into_iter().find(|&pos| {
        scratch.set(pos, Square::Occupied(mark));
        let wins = check_winner(&scratch) == Some(mark);
        scratch.set(pos, Square::Empty);
        wins
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_is_detected_for_both_marks() {
        for line in LINES {
            for mark in [Mark::Human, Mark::System] {
                let mut board = Board::new();
                for pos in line {
                    board.set(pos, Square::Occupied(mark));
                }
                assert_eq!(check_winner(&board), Some(mark), "line {line:?}");
                assert_eq!(winning_line(&board), Some((line, mark)));
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::from_layout("XXO ... ...");
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = Board::from_layout("XX. .O. ...");
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_find_winning_move() {
        let board = Board::from_layout("XX. .O. ..O");
        assert_eq!(find_winning_move(&board, Mark::Human), Some(Position::TopRight));
        assert_eq!(find_winning_move(&board, Mark::System), None);

        let board = Board::from_layout("XX. .O. O.X");
        assert_eq!(find_winning_move(&board, Mark::System), Some(Position::TopRight));
    }
}
