//! Walks the script one node at a time.
//!
//! The controller is a small state machine over [`FlowState`]. Each step
//! runs one node's full sequence to completion before the cursor moves, so
//! exactly one node is ever active. Sub-flows run inline and always resume
//! the main line at their join node.

use super::session::FlowSession;
use crate::config::FlowConfig;
use crate::games::tictactoe::ReportedOutcome;
use crate::ports::{Anchor, EffectsPort, PresentationPort, UserInput};
use crate::script::{ChoiceAction, Cue, NodeId, Script, SubFlow, Successor};
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, instrument};

/// Pause between the heart bursting and the epilogue.
const HEART_SETTLE: Duration = Duration::from_millis(1000);

/// Interval between idle hearts.
const IDLE_BEAT: Duration = Duration::from_millis(800);

/// Where the controller is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Deliver a node's messages.
    Deliver(NodeId),
    /// Wait on the node's choice set.
    AwaitChoice(NodeId),
    /// Run the node's sub-flow.
    SubFlow(NodeId),
    /// The script is done; only celebration remains.
    Idle,
    /// Nothing more will happen.
    Stopped(Ending),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Ending {
    /// Reached the celebration.
    Celebrated,
    /// The input source closed while input was awaited.
    InputClosed,
    /// The script pointed at a node it does not define.
    MissingNode(NodeId),
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Nodes entered, in order.
    pub visited: Vec<NodeId>,
    /// How the run ended.
    pub ending: Ending,
    /// Reported result of the game, if one was played.
    pub game: Option<ReportedOutcome>,
}

/// Runs a [`Script`] against a [`FlowSession`].
pub struct FlowController<P, E> {
    script: Script,
    session: FlowSession<P, E>,
    cursor: NodeId,
    visited: Vec<NodeId>,
    game: Option<ReportedOutcome>,
}

impl<P, E> FlowController<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Wires a controller to its ports, with the cursor on the entry node.
    pub fn new(
        script: Script,
        presentation: P,
        effects: E,
        input: UnboundedReceiver<UserInput>,
        config: &FlowConfig,
    ) -> Self {
        let cursor = script.entry();
        Self {
            script,
            session: FlowSession::new(presentation, effects, input, config),
            cursor,
            visited: Vec::new(),
            game: None,
        }
    }

    /// The node the cursor is on.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// The session context.
    pub fn session(&self) -> &FlowSession<P, E> {
        &self.session
    }

    /// The presentation port.
    pub fn presentation(&self) -> &P {
        self.session.presentation()
    }

    /// The effects port.
    pub fn effects(&self) -> &E {
        self.session.effects()
    }

    /// Runs the script from its entry node until the celebration starts or
    /// input closes.
    #[instrument(skip(self), fields(entry = %self.script.entry()))]
    pub async fn run(&mut self) -> Transcript {
        let mut state = FlowState::Deliver(self.script.entry());
        let ending = loop {
            state = match state {
                FlowState::Deliver(id) => self.deliver(id).await,
                FlowState::AwaitChoice(id) => self.await_choice(id).await,
                FlowState::SubFlow(id) => self.sub_flow(id).await,
                FlowState::Idle => break Ending::Celebrated,
                FlowState::Stopped(ending) => break ending,
            };
        };
        info!(%ending, visited = self.visited.len(), "flow finished");
        Transcript {
            visited: self.visited.clone(),
            ending,
            game: self.game,
        }
    }

    /// One idle beat: a pause, then a heart floating up from a random spot
    /// at the bottom of the screen.
    pub async fn idle_beat(&mut self) {
        self.session.suspend(IDLE_BEAT).await;
        let x = self.session.rng.gen_range(0.0..1.0);
        self.session.float_heart(Anchor::Screen { x, y: 1.0 });
    }

    /// Celebrates forever.
    pub async fn idle(&mut self) {
        loop {
            self.idle_beat().await;
        }
    }

    async fn deliver(&mut self, id: NodeId) -> FlowState {
        self.cursor = id;
        self.visited.push(id);
        info!(%id, "entering node");

        let Some(node) = self.script.node(id) else {
            return missing(id);
        };
        if let Some(Cue::ConfettiStream(duration)) = node.cue {
            self.session.effects.confetti_stream(duration);
        }
        for message in &node.messages {
            self.session.deliver_message(message).await;
        }

        match &node.successor {
            Successor::Next(next) => FlowState::Deliver(*next),
            Successor::Choices(_) => FlowState::AwaitChoice(id),
            Successor::SubFlow { .. } => FlowState::SubFlow(id),
            Successor::Idle => FlowState::Idle,
        }
    }

    async fn await_choice(&mut self, id: NodeId) -> FlowState {
        let Some(node) = self.script.node(id) else {
            return missing(id);
        };
        let Successor::Choices(set) = &node.successor else {
            return FlowState::Deliver(id);
        };
        let Some(choice) = self.session.present_choices(set).await else {
            return FlowState::Stopped(Ending::InputClosed);
        };

        match choice.action {
            ChoiceAction::Advance(next) => FlowState::Deliver(next),
            ChoiceAction::Autocorrect {
                typed,
                target,
                reaction,
                settle,
                then,
            } => {
                self.session
                    .autocorrect(typed, target, reaction.as_ref(), settle)
                    .await;
                FlowState::Deliver(then)
            }
        }
    }

    async fn sub_flow(&mut self, id: NodeId) -> FlowState {
        let Some(node) = self.script.node(id) else {
            return missing(id);
        };
        let Successor::SubFlow { flow, join } = &node.successor else {
            return FlowState::Deliver(id);
        };

        match flow {
            SubFlow::TicTacToe { on_loss, on_win } => {
                let Some(outcome) = self.session.play_tictactoe().await else {
                    return FlowState::Stopped(Ending::InputClosed);
                };
                self.game = Some(outcome);
                let epilogue = match outcome {
                    ReportedOutcome::Loss => on_loss,
                    ReportedOutcome::Win => on_win,
                };
                self.session.deliver_message(epilogue).await;
            }
            SubFlow::HeartTap { epilogue } => {
                if !self.session.tap_heart().await {
                    return FlowState::Stopped(Ending::InputClosed);
                }
                self.session.suspend(HEART_SETTLE).await;
                self.session.deliver_message(epilogue).await;
            }
        }

        info!(from = %id, to = %join, "sub-flow joined main line");
        FlowState::Deliver(*join)
    }
}

fn missing(id: NodeId) -> FlowState {
    error!(%id, "script references an undefined node");
    FlowState::Stopped(Ending::MissingNode(id))
}
