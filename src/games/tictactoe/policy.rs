//! Move selection for the system's ordinary turns.
//!
//! The policy only shapes how close the human gets. The engine overrides
//! any human win or draw afterwards, so nothing here decides the outcome.

use super::rules::find_winning_move;
use super::{Board, Mark, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Heuristic move picker: win, maybe block, center, then random.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomePolicy {
    /// With this many empty cells or fewer, blocking may be skipped.
    pub risky_threshold: usize,
    /// Chance of skipping a block once the board is past the threshold.
    pub skip_block_probability: f64,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        Self {
            risky_threshold: 4,
            skip_block_probability: 0.5,
        }
    }
}

impl OutcomePolicy {
    /// Chooses the system's next cell, or `None` on a full board.
    ///
    /// Priority:
    /// 1. complete a system line,
    /// 2. block the human's immediate win, unless a risky skip is drawn,
    /// 3. take the center,
    /// 4. any empty cell uniformly at random.
    #[instrument(skip(self, board, rng))]
    pub fn choose_move<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Position> {
        if let Some(pos) = find_winning_move(board, Mark::System) {
            debug!(%pos, "taking winning cell");
            return Some(pos);
        }

        let empty = board.empty_positions();
        if !self.skips_block(empty.len(), rng) {
            if let Some(pos) = find_winning_move(board, Mark::Human) {
                debug!(%pos, "blocking human line");
                return Some(pos);
            }
        } else {
            debug!(empty = empty.len(), "risky play: leaving the block open");
        }

        if board.is_empty(Position::Center) {
            return Some(Position::Center);
        }

        empty.choose(rng).copied()
    }

    fn skips_block<R: Rng + ?Sized>(&self, empty: usize, rng: &mut R) -> bool {
        empty <= self.risky_threshold && rng.gen_bool(self.skip_block_probability.clamp(0.0, 1.0))
    }
}
