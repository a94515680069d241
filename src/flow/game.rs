//! Drives the rigged game inside the conversation.

use super::session::FlowSession;
use crate::games::tictactoe::{
    AiMove, Followup, GameEngine, GameOutcome, HumanTurn, Mark, Position, ReportedOutcome,
    Resolution, Square, StatusLine,
};
use crate::ports::{Anchor, CellFx, EffectsPort, InputPrompt, PresentationPort, UserInput};
use crate::script::ScriptMessage;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, instrument};

const AI_THINKING: Duration = Duration::from_millis(600);
const CHEAT_PAUSE: Duration = Duration::from_millis(1000);
const DRAW_PAUSE: Duration = Duration::from_millis(800);
const RESOLUTION_DELAY: Duration = Duration::from_millis(1500);
const CELL_HEART_CHANCE: f64 = 0.1;
const STEAL_GLYPH: &str = "😈";

impl<P, E> FlowSession<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Plays one game to its reported outcome.
    ///
    /// Returns `None` if input closes before the game ends.
    #[instrument(skip(self))]
    pub async fn play_tictactoe(&mut self) -> Option<ReportedOutcome> {
        let mut engine = GameEngine::new(self.policy);
        self.presentation.render_board();
        for pos in Position::ALL {
            self.presentation.render_board_cell(pos, Square::Empty, CellFx::Plain);
        }
        self.status(StatusLine::Intro);

        loop {
            self.presentation
                .render_prompt(&InputPrompt::Board(engine.board().clone()));
            let pos = loop {
                match self.next_input().await? {
                    UserInput::TapCell(pos) => break pos,
                    other => debug!(?other, "not a cell, ignored"),
                }
            };
            if self.rng.gen_bool(CELL_HEART_CHANCE) {
                self.float_heart(Anchor::Cell(pos));
            }

            let turn = match engine.human_move(pos) {
                Ok(turn) => turn,
                Err(err) => {
                    debug!(%err, "cell tap ignored");
                    continue;
                }
            };

            match turn {
                HumanTurn::Intercepted(interception) => {
                    let pos = interception.position();
                    self.presentation
                        .render_board_cell(pos, Square::Occupied(Mark::Human), CellFx::Wiggle);
                    self.status(StatusLine::Suspicious);
                    self.suspend(CHEAT_PAUSE).await;

                    let followup = engine.resolve_interception(interception);
                    self.show_steal(pos);
                    let resolution = match followup {
                        Followup::Resolved(resolution) => resolution,
                        Followup::AwaitHuman => {
                            self.status(StatusLine::MySpotNow);
                            continue;
                        }
                        other => match self.follow(&mut engine, other).await {
                            Some(outcome) => return Some(outcome),
                            None => continue,
                        },
                    };

                    self.status(resolution.status);
                    if resolution.raw == Some(GameOutcome::SystemWin) {
                        self.suspend(CHEAT_PAUSE).await;
                        self.deliver_message(&ScriptMessage::received(
                            "See? I told you I’m tricky! 😆",
                            500,
                        ))
                        .await;
                    } else {
                        self.suspend(RESOLUTION_DELAY).await;
                    }
                    return Some(finish(resolution));
                }
                HumanTurn::Committed(followup) => {
                    self.presentation
                        .render_board_cell(pos, Square::Occupied(Mark::Human), CellFx::Plain);
                    if let Some(outcome) = self.follow(&mut engine, followup).await {
                        return Some(outcome);
                    }
                }
            }
        }
    }

    /// Plays out engine steps until the human is up again or the game ends.
    async fn follow(&mut self, engine: &mut GameEngine, mut next: Followup) -> Option<ReportedOutcome> {
        loop {
            next = match next {
                Followup::AiThinking(turn) => {
                    self.status(StatusLine::Thinking);
                    self.suspend(AI_THINKING).await;
                    let AiMove { position, followup } = engine.ai_move(turn, &mut self.rng);
                    if let Some(pos) = position {
                        self.presentation
                            .render_board_cell(pos, Square::Occupied(Mark::System), CellFx::Plain);
                    }
                    followup
                }
                Followup::AwaitHuman => {
                    self.status(StatusLine::YourTurn);
                    return None;
                }
                Followup::DrawPending(fix) => {
                    self.status(StatusLine::DrawPending);
                    self.suspend(DRAW_PAUSE).await;
                    let resolution = engine.settle_draw(fix, &mut self.rng);
                    if let Some(pos) = resolution.overwritten {
                        self.show_steal(pos);
                    }
                    self.status(resolution.status);
                    self.suspend(RESOLUTION_DELAY).await;
                    return Some(finish(resolution));
                }
                Followup::Resolved(resolution) => {
                    self.status(resolution.status);
                    self.suspend(RESOLUTION_DELAY).await;
                    return Some(finish(resolution));
                }
            };
        }
    }

    /// Flashes the overwritten cell, pins the cheat glyph and bursts confetti.
    fn show_steal(&mut self, pos: Position) {
        let anchor = Anchor::Cell(pos);
        self.presentation
            .render_board_cell(pos, Square::Occupied(Mark::System), CellFx::Stolen);
        self.react(anchor, STEAL_GLYPH);
        self.effects.confetti_burst(anchor);
    }

    fn status(&mut self, line: StatusLine) {
        self.presentation.render_game_status(&line.to_string());
    }
}

fn finish(resolution: Resolution) -> ReportedOutcome {
    info!(
        reported = %resolution.reported,
        raw = ?resolution.raw,
        overwritten = ?resolution.overwritten,
        "game finished"
    );
    resolution.reported
}
