//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). The rigging lives in the
//! engine and the policy; these rules only report what the board shows.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, find_winning_move, winning_line};
