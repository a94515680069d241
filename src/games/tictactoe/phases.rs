//! Engine phases and the two outcome vocabularies.
//!
//! [`GameOutcome`] is what the board actually shows. [`ReportedOutcome`] is
//! what the engine tells the conversation. They are kept apart on purpose:
//! the engine rewrites the board so that the reported result is always a
//! loss for the human, and the raw result may disagree with the claim.

use super::Position;
use serde::{Deserialize, Serialize};

/// Where the engine is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the human to pick a cell.
    AwaitingHumanMove,
    /// A human move is being checked.
    EvaluatingMove,
    /// The system is about to play.
    AiThinking,
    /// The human would have won at this cell; the steal is pending.
    CheatPending(Position),
    /// The board filled without a line; the rigged draw fix is pending.
    DrawPending,
    /// The game is over.
    Resolved(ReportedOutcome),
}

impl GamePhase {
    /// Short description used in logs and errors.
    pub fn describe(self) -> &'static str {
        match self {
            GamePhase::AwaitingHumanMove => "awaiting human move",
            GamePhase::EvaluatingMove => "evaluating move",
            GamePhase::AiThinking => "thinking",
            GamePhase::CheatPending(_) => "cheating",
            GamePhase::DrawPending => "settling draw",
            GamePhase::Resolved(_) => "resolved",
        }
    }
}

/// Result as computed from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The system holds a complete line.
    SystemWin,
    /// The human holds a complete line.
    HumanWin,
    /// Full board, no line.
    Draw,
}

/// Result handed back to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ReportedOutcome {
    /// The human lost. Every reachable path ends here.
    #[strum(to_string = "loss")]
    Loss,
    /// The human won. Only reachable if the rigging were bypassed.
    #[strum(to_string = "win")]
    Win,
}

/// Status line shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StatusLine {
    /// Shown when the board first appears.
    #[display("Beat me to say no! (You are X)")]
    Intro,
    /// The system is picking a move.
    #[display("Thinking... 🤔")]
    Thinking,
    /// Waiting for the human.
    #[display("Your turn!")]
    YourTurn,
    /// The human's winning mark is on the board, briefly.
    #[display("Wait... 🤨")]
    Suspicious,
    /// The stolen cell completed a system line.
    #[display("Haha! I win! 😎 Better luck next time!")]
    StolenWin,
    /// The steal filled the board without a line; the win is claimed anyway.
    #[display("Wait... actually I win! 😜")]
    ClaimedWin,
    /// The steal decided nothing; the human plays on.
    #[display("My spot now! Your turn! 😈")]
    MySpotNow,
    /// An ordinary system win.
    #[display("I win! 😎")]
    SystemWin,
    /// Defensive only.
    #[display("You won?! 😱")]
    HumanWin,
    /// The board filled up with no line.
    #[display("It's a draw... wait!")]
    DrawPending,
    /// The draw has been rewritten.
    #[display("Actually... I win! 😜")]
    DrawRigged,
}

/// How a game ended, as produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// What the conversation is told.
    pub reported: ReportedOutcome,
    /// What the final board actually shows, if anything decisive.
    pub raw: Option<GameOutcome>,
    /// The human cell that was flipped to the system, if any.
    pub overwritten: Option<Position>,
    /// Final status line.
    pub status: StatusLine,
}
