//! Rigged tic-tac-toe engine.
//!
//! The engine owns the board for one game and walks it through
//! `AwaitingHumanMove → EvaluatingMove → (AiThinking | CheatPending) →
//! AwaitingHumanMove | Resolved`. It never waits on anything itself: every
//! step that the conversation wants to pause before is handed back as a
//! token ([`Interception`], [`AiTurn`], [`DrawFix`]) that only this engine
//! can mint, so the driver cannot skip or repeat a step.
//!
//! The rigging rules:
//! - a human move that would complete a line is intercepted and the cell is
//!   handed to the system, which ends the game only if that completes a
//!   system line or fills the board;
//! - a full board with no line is rewritten by flipping a human cell.
//!
//! Every game that ends is reported as [`ReportedOutcome::Loss`].

use super::phases::{GameOutcome, GamePhase, ReportedOutcome, Resolution, StatusLine};
use super::policy::OutcomePolicy;
use super::rules::{LINES, check_winner, is_full};
use super::{Board, Mark, MoveError, Position, Square};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

/// Proof that a human move was intercepted; redeem with
/// [`GameEngine::resolve_interception`] after the dramatic pause.
#[derive(Debug)]
#[must_use]
pub struct Interception {
    position: Position,
}

impl Interception {
    /// The cell the human tried to win with.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Proof that the system is due to move; redeem with [`GameEngine::ai_move`].
#[derive(Debug)]
#[must_use]
pub struct AiTurn {
    _private: (),
}

/// Proof that the board is a draw waiting to be rigged; redeem with
/// [`GameEngine::settle_draw`].
#[derive(Debug)]
#[must_use]
pub struct DrawFix {
    _private: (),
}

/// What happens after a committed move.
#[derive(Debug)]
#[must_use]
pub enum Followup {
    /// The system moves next.
    AiThinking(AiTurn),
    /// The human moves next.
    AwaitHuman,
    /// The board is full with no line.
    DrawPending(DrawFix),
    /// The game ended on the board as it stands.
    Resolved(Resolution),
}

/// Verdict on a human move.
#[derive(Debug)]
#[must_use]
pub enum HumanTurn {
    /// The move would have won; the human mark is shown but will be stolen.
    Intercepted(Interception),
    /// The move stands.
    Committed(Followup),
}

/// Result of the system's move.
#[derive(Debug)]
#[must_use]
pub struct AiMove {
    /// Where the system played, if any cell was free.
    pub position: Option<Position>,
    /// What comes next.
    pub followup: Followup,
}

/// Owns the board and turn sequencing for one game.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    phase: GamePhase,
    policy: OutcomePolicy,
}

impl GameEngine {
    /// Starts a game on an empty board, waiting for the human.
    #[instrument]
    pub fn new(policy: OutcomePolicy) -> Self {
        Self {
            board: Board::new(),
            phase: GamePhase::AwaitingHumanMove,
            policy,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Final reported outcome, once resolved.
    pub fn reported(&self) -> Option<ReportedOutcome> {
        match self.phase {
            GamePhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Applies a human move at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the game is over, the engine is not
    /// waiting for the human, or the cell is taken. Callers treat these as
    /// silent no-ops.
    #[instrument(skip(self), fields(phase = self.phase.describe()))]
    pub fn human_move(&mut self, pos: Position) -> Result<HumanTurn, MoveError> {
        match self.phase {
            GamePhase::AwaitingHumanMove => {}
            GamePhase::Resolved(_) => return Err(MoveError::GameOver),
            other => return Err(MoveError::NotYourTurn(other.describe())),
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }

        self.phase = GamePhase::EvaluatingMove;
        self.board.set(pos, Square::Occupied(Mark::Human));

        if check_winner(&self.board) == Some(Mark::Human) {
            info!(%pos, "human move would win, intercepting");
            self.phase = GamePhase::CheatPending(pos);
            return Ok(HumanTurn::Intercepted(Interception { position: pos }));
        }

        debug!(%pos, "human move committed");
        Ok(HumanTurn::Committed(self.evaluate(GamePhase::AiThinking)))
    }

    /// Hands the intercepted cell to the system.
    ///
    /// The game ends as a [`ReportedOutcome::Loss`] when the stolen cell
    /// completes a system line or fills the board. Otherwise the human moves
    /// again and [`Followup::AwaitHuman`] is returned; the system does not
    /// get an extra turn.
    #[instrument(skip(self, interception), fields(pos = %interception.position))]
    pub fn resolve_interception(&mut self, interception: Interception) -> Followup {
        let pos = interception.position;
        debug_assert_eq!(self.phase, GamePhase::CheatPending(pos));
        self.board.set(pos, Square::Occupied(Mark::System));

        let raw = outcome_of(&self.board);
        let status = match raw {
            Some(GameOutcome::SystemWin) => StatusLine::StolenWin,
            Some(_) => StatusLine::ClaimedWin,
            None => {
                debug!(%pos, "cell stolen, game goes on");
                self.phase = GamePhase::AwaitingHumanMove;
                return Followup::AwaitHuman;
            }
        };
        Followup::Resolved(self.resolve(Resolution {
            reported: ReportedOutcome::Loss,
            raw,
            overwritten: Some(pos),
            status,
        }))
    }

    /// Plays the system's move chosen by the [`OutcomePolicy`].
    #[instrument(skip_all)]
    pub fn ai_move<R: Rng + ?Sized>(&mut self, _turn: AiTurn, rng: &mut R) -> AiMove {
        debug_assert_eq!(self.phase, GamePhase::AiThinking);
        let position = self.policy.choose_move(&self.board, rng);
        if let Some(pos) = position {
            debug!(%pos, "system plays");
            self.board.set(pos, Square::Occupied(Mark::System));
        }
        AiMove {
            position,
            followup: self.evaluate(GamePhase::AwaitingHumanMove),
        }
    }

    /// Rewrites a drawn board into a system win and ends the game.
    ///
    /// Prefers a line holding two system marks and one human mark, flipping
    /// the human cell. Without such a line a random human cell is flipped and
    /// the win is claimed regardless of what the board then shows.
    #[instrument(skip_all)]
    pub fn settle_draw<R: Rng + ?Sized>(&mut self, _fix: DrawFix, rng: &mut R) -> Resolution {
        debug_assert_eq!(self.phase, GamePhase::DrawPending);
        let target = steal_target(&self.board).or_else(|| {
            let humans = self.board.positions_of(Mark::Human);
            let pick = humans.choose(rng).copied();
            warn!(?pick, "no two-system line on drawn board, flipping an arbitrary cell");
            pick
        });

        if let Some(pos) = target {
            self.board.set(pos, Square::Occupied(Mark::System));
        }

        let raw = outcome_of(&self.board);
        if raw != Some(GameOutcome::SystemWin) {
            warn!(?raw, "claiming a system win the board does not show");
        }
        self.resolve(Resolution {
            reported: ReportedOutcome::Loss,
            raw,
            overwritten: target,
            status: StatusLine::DrawRigged,
        })
    }

    /// Looks at the board after a committed move and decides what is next.
    fn evaluate(&mut self, on_continue: GamePhase) -> Followup {
        match outcome_of(&self.board) {
            Some(GameOutcome::SystemWin) => Followup::Resolved(self.resolve(Resolution {
                reported: ReportedOutcome::Loss,
                raw: Some(GameOutcome::SystemWin),
                overwritten: None,
                status: StatusLine::SystemWin,
            })),
            Some(GameOutcome::HumanWin) => {
                warn!("human line reached the board unintercepted");
                Followup::Resolved(self.resolve(Resolution {
                    reported: ReportedOutcome::Win,
                    raw: Some(GameOutcome::HumanWin),
                    overwritten: None,
                    status: StatusLine::HumanWin,
                }))
            }
            Some(GameOutcome::Draw) => {
                self.phase = GamePhase::DrawPending;
                Followup::DrawPending(DrawFix { _private: () })
            }
            None => {
                self.phase = on_continue;
                match on_continue {
                    GamePhase::AiThinking => Followup::AiThinking(AiTurn { _private: () }),
                    _ => Followup::AwaitHuman,
                }
            }
        }
    }

    fn resolve(&mut self, resolution: Resolution) -> Resolution {
        info!(reported = %resolution.reported, raw = ?resolution.raw, "game resolved");
        self.phase = GamePhase::Resolved(resolution.reported);
        resolution
    }
}

/// Raw outcome of a board: a line wins, else a full board is a draw.
pub fn outcome_of(board: &Board) -> Option<GameOutcome> {
    match check_winner(board) {
        Some(Mark::System) => Some(GameOutcome::SystemWin),
        Some(Mark::Human) => Some(GameOutcome::HumanWin),
        None if is_full(board) => Some(GameOutcome::Draw),
        None => None,
    }
}

/// Finds the human cell in the first line holding two system marks and one
/// human mark.
pub fn steal_target(board: &Board) -> Option<Position> {
    LINES.iter().find_map(|line| {
        let count = |mark| line.iter().filter(|p| board.get(**p) == Square::Occupied(mark)).count();
        if count(Mark::System) == 2 && count(Mark::Human) == 1 {
            line.iter().copied().find(|p| board.get(*p) == Square::Occupied(Mark::Human))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine_with(layout: &str, phase: GamePhase) -> GameEngine {
        GameEngine {
            board: Board::from_layout(layout),
            phase,
            policy: OutcomePolicy::default(),
        }
    }

    #[test]
    fn test_steal_on_an_open_board_hands_the_turn_back() {
        let mut engine = engine_with("XX. .O. ..O", GamePhase::AwaitingHumanMove);
        let turn = engine.human_move(Position::TopRight).unwrap();
        let HumanTurn::Intercepted(interception) = turn else {
            panic!("expected interception, got {turn:?}");
        };
        assert_eq!(engine.phase(), GamePhase::CheatPending(Position::TopRight));
        // The human mark is visible until the steal.
        assert_eq!(engine.board().get(Position::TopRight), Square::Occupied(Mark::Human));

        let followup = engine.resolve_interception(interception);
        assert!(matches!(followup, Followup::AwaitHuman), "{followup:?}");
        assert_eq!(engine.board().get(Position::TopRight), Square::Occupied(Mark::System));
        assert_eq!(engine.phase(), GamePhase::AwaitingHumanMove);
        assert_eq!(engine.reported(), None);
        assert_eq!(engine.board().empty_positions().len(), 4);

        // The game carries on from the stolen board.
        assert!(engine.human_move(Position::MiddleLeft).is_ok());
    }

    #[test]
    fn test_stolen_cell_completing_a_line_reports_raw_system_win() {
        // O at 4 and 6: stealing 2 completes the anti-diagonal.
        let mut engine = engine_with("XX. .O. O.X", GamePhase::AwaitingHumanMove);
        let HumanTurn::Intercepted(i) = engine.human_move(Position::TopRight).unwrap() else {
            panic!("expected interception");
        };
        let Followup::Resolved(resolution) = engine.resolve_interception(i) else {
            panic!("a completed system line ends the game");
        };
        assert_eq!(resolution.reported, ReportedOutcome::Loss);
        assert_eq!(resolution.overwritten, Some(Position::TopRight));
        assert_eq!(resolution.raw, Some(GameOutcome::SystemWin));
        assert_eq!(resolution.status, StatusLine::StolenWin);
        assert_eq!(engine.reported(), Some(ReportedOutcome::Loss));
    }

    #[test]
    fn test_steal_filling_the_board_claims_the_win() {
        // The last free cell wins the top row for X; as O it completes nothing.
        let mut engine = engine_with("XX. OOX XOO", GamePhase::AwaitingHumanMove);
        let HumanTurn::Intercepted(i) = engine.human_move(Position::TopRight).unwrap() else {
            panic!("expected interception");
        };
        let Followup::Resolved(resolution) = engine.resolve_interception(i) else {
            panic!("a full board ends the game");
        };
        assert_eq!(resolution.reported, ReportedOutcome::Loss);
        assert_eq!(resolution.raw, Some(GameOutcome::Draw));
        assert_eq!(resolution.status, StatusLine::ClaimedWin);
        assert_eq!(engine.reported(), Some(ReportedOutcome::Loss));
    }

    #[test]
    fn test_moves_rejected_outside_human_turn() {
        let mut engine = engine_with(".........", GamePhase::AiThinking);
        assert!(matches!(
            engine.human_move(Position::Center),
            Err(MoveError::NotYourTurn(_))
        ));

        let mut engine = engine_with("X........", GamePhase::AwaitingHumanMove);
        assert_eq!(
            engine.human_move(Position::TopLeft).unwrap_err(),
            MoveError::SquareOccupied(Position::TopLeft)
        );

        let mut engine = engine_with(".........", GamePhase::Resolved(ReportedOutcome::Loss));
        assert_eq!(engine.human_move(Position::Center).unwrap_err(), MoveError::GameOver);
    }

    #[test]
    fn test_draw_flips_human_cell_in_two_system_line() {
        // X O X / X O O / O X X: no line. Row 1 (X O O) holds two system marks.
        let mut engine = engine_with("XOX XOO OXX", GamePhase::DrawPending);
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = engine.settle_draw(DrawFix { _private: () }, &mut rng);
        assert_eq!(resolution.reported, ReportedOutcome::Loss);
        assert_eq!(resolution.overwritten, Some(Position::MiddleLeft));
        assert_eq!(resolution.raw, Some(GameOutcome::SystemWin));
        assert_eq!(check_winner(engine.board()), Some(Mark::System));
    }

    #[test]
    fn test_draw_without_two_system_line_flips_any_human_cell() {
        // No line holds two O, so there is no natural steal.
        let layout = "XO. .X. ...";
        assert_eq!(steal_target(&Board::from_layout(layout)), None);

        for seed in 0..16 {
            let mut engine = engine_with(layout, GamePhase::DrawPending);
            let mut rng = StdRng::seed_from_u64(seed);
            let resolution = engine.settle_draw(DrawFix { _private: () }, &mut rng);

            assert_eq!(resolution.reported, ReportedOutcome::Loss);
            assert_eq!(resolution.status, StatusLine::DrawRigged);
            let flipped = resolution.overwritten.unwrap();
            assert!([Position::TopLeft, Position::Center].contains(&flipped));
            assert_eq!(engine.board().get(flipped), Square::Occupied(Mark::System));
            // The claim stands even though the board shows no system line.
            assert_ne!(resolution.raw, Some(GameOutcome::SystemWin));
            assert_eq!(resolution.raw, outcome_of(engine.board()));
            assert_eq!(engine.reported(), Some(ReportedOutcome::Loss));
        }
    }

    #[test]
    fn test_every_full_drawn_board_has_a_steal_target() {
        for bits in 0u16..512 {
            let layout: String = (0..9)
                .map(|i| if bits & (1 << i) == 0 { 'X' } else { 'O' })
                .collect();
            let board = Board::from_layout(&layout);
            if outcome_of(&board) == Some(GameOutcome::Draw) {
                assert!(steal_target(&board).is_some(), "{layout}");
            }
        }
    }

    #[test]
    fn test_steal_target_requires_exactly_two_system_marks() {
        assert_eq!(steal_target(&Board::from_layout("XXO ... ...")), None);
        assert_eq!(
            steal_target(&Board::from_layout("OXO ... ...")),
            Some(Position::TopCenter)
        );
    }

    #[test]
    fn test_ai_move_can_end_the_game() {
        let mut engine = engine_with("XX. OO. X.X", GamePhase::AiThinking);
        let mut rng = StdRng::seed_from_u64(11);
        let AiMove { position, followup } = engine.ai_move(AiTurn { _private: () }, &mut rng);
        assert_eq!(position, Some(Position::MiddleRight));
        let Followup::Resolved(resolution) = followup else {
            panic!("expected resolution, got {followup:?}");
        };
        assert_eq!(resolution.status, StatusLine::SystemWin);
        assert_eq!(engine.reported(), Some(ReportedOutcome::Loss));
    }
}
