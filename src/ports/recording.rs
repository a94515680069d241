//! In-memory ports that record every call.
//!
//! [`RecordingPresenter`] can carry an [`Autopilot`] that answers each
//! [`InputPrompt`] by pushing input into the flow's channel, which makes a
//! whole conversation replayable without a real surface.

use super::effects::EffectsPort;
use super::input::UserInput;
use super::presentation::{
    Anchor, CellFx, ChromeFeatures, ChromeFx, ElementId, InputPrompt, PresentationPort,
};
use crate::games::tictactoe::{Board, Position, Square};
use crate::script::{ChoiceSetId, Sender};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// A recorded presentation call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// `render_message`.
    Message {
        /// Element handle.
        id: ElementId,
        /// Bubble text.
        text: String,
        /// Bubble side.
        sender: Sender,
    },
    /// `render_typing_indicator`.
    TypingIndicator {
        /// Element handle.
        id: ElementId,
        /// Heart dot shown.
        heart: bool,
    },
    /// `render_choices`.
    Choices {
        /// Element handle.
        id: ElementId,
        /// Presentation id.
        set: ChoiceSetId,
        /// Labels in order.
        labels: Vec<&'static str>,
    },
    /// `render_notification`.
    Notification(String),
    /// `render_board`.
    Board(ElementId),
    /// `render_board_cell`.
    Cell {
        /// Cell.
        position: Position,
        /// New contents.
        square: Square,
        /// Animation.
        fx: CellFx,
    },
    /// `render_game_status`.
    GameStatus(String),
    /// `render_heart`.
    Heart(ElementId),
    /// `render_heart_status`.
    HeartStatus {
        /// Status text.
        text: String,
        /// Taps so far.
        taps: u32,
    },
    /// `render_reaction`.
    Reaction {
        /// Element handle.
        id: ElementId,
        /// Pinned to.
        anchor: Anchor,
        /// Emoji.
        glyph: String,
    },
    /// `render_input_draft`.
    InputDraft {
        /// Draft text, `None` for the placeholder.
        draft: Option<String>,
        /// Highlighted as corrected.
        highlighted: bool,
    },
    /// `render_prompt`.
    Prompt(InputPrompt),
    /// `render_chrome`.
    Chrome(ChromeFx),
    /// `remove_element`.
    Removed(ElementId),
}

/// A recorded effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    /// `confetti_burst`.
    ConfettiBurst(Anchor),
    /// `confetti_stream`.
    ConfettiStream(Duration),
    /// `floating_heart`.
    FloatingHeart(Anchor, String),
    /// `vibrate`.
    Vibrate(Vec<u64>),
}

/// Scripted answers to prompts.
#[derive(Debug)]
pub struct Autopilot {
    input: UnboundedSender<UserInput>,
    choices: VecDeque<usize>,
    cells: VecDeque<Position>,
    repeat: usize,
}

impl Autopilot {
    /// Answers every choice with the first option and every board with the
    /// first empty cell.
    pub fn new(input: UnboundedSender<UserInput>) -> Self {
        Self {
            input,
            choices: VecDeque::new(),
            cells: VecDeque::new(),
            repeat: 1,
        }
    }

    /// Option indices to pick, in order. Falls back to 0 once exhausted.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.choices = choices.into_iter().collect();
        self
    }

    /// Cells to play, in order. Occupied ones are skipped.
    pub fn with_cells(mut self, cells: impl IntoIterator<Item = Position>) -> Self {
        self.cells = cells.into_iter().collect();
        self
    }

    /// Sends every answer `times` times in a row, like a frantic double click.
    pub fn repeating(mut self, times: usize) -> Self {
        self.repeat = times.max(1);
        self
    }

    fn answer(&mut self, prompt: &InputPrompt) {
        let input = match prompt {
            InputPrompt::Choices { set, labels } => {
                let index = self
                    .choices
                    .pop_front()
                    .unwrap_or(0)
                    .min(labels.len().saturating_sub(1));
                UserInput::Choose { set: *set, index }
            }
            InputPrompt::Board(board) => match self.next_cell(board) {
                Some(pos) => UserInput::TapCell(pos),
                None => return,
            },
            InputPrompt::Heart { .. } => UserInput::TapHeart,
        };
        for _ in 0..self.repeat {
            // A closed channel only means the flow is finished.
            let _ = self.input.send(input);
        }
    }

    fn next_cell(&mut self, board: &Board) -> Option<Position> {
        while let Some(pos) = self.cells.pop_front() {
            if board.is_empty(pos) {
                return Some(pos);
            }
        }
        board.empty_positions().first().copied()
    }
}

/// Presentation port that keeps a log of every call.
#[derive(Debug)]
pub struct RecordingPresenter {
    features: ChromeFeatures,
    next_id: u64,
    attached: HashSet<ElementId>,
    events: Vec<PresentationEvent>,
    autopilot: Option<Autopilot>,
}

impl RecordingPresenter {
    /// A presenter with the given chrome and no autopilot.
    pub fn new(features: ChromeFeatures) -> Self {
        Self {
            features,
            next_id: 0,
            attached: HashSet::new(),
            events: Vec::new(),
            autopilot: None,
        }
    }

    /// Attaches an autopilot.
    pub fn with_autopilot(mut self, autopilot: Autopilot) -> Self {
        self.autopilot = Some(autopilot);
        self
    }

    /// Every call so far.
    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    /// Chat bubbles so far, in order.
    pub fn messages(&self) -> Vec<(Sender, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresentationEvent::Message { text, sender, .. } => Some((*sender, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Game status lines so far.
    pub fn statuses(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresentationEvent::GameStatus(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times `id` was removed.
    pub fn removals_of(&self, id: ElementId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresentationEvent::Removed(r) if *r == id))
            .count()
    }

    /// Drops an element without going through the flow, as a surface might.
    pub fn detach(&mut self, id: ElementId) {
        self.attached.remove(&id);
    }

    fn mount(&mut self) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.attached.insert(id);
        id
    }

    fn record(&mut self, event: PresentationEvent) {
        trace!(?event, "presentation");
        self.events.push(event);
    }
}

impl PresentationPort for RecordingPresenter {
    fn chrome(&self) -> ChromeFeatures {
        self.features
    }

    fn render_message(&mut self, text: &str, sender: Sender) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::Message {
            id,
            text: text.to_string(),
            sender,
        });
        id
    }

    fn render_typing_indicator(&mut self, heart: bool) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::TypingIndicator { id, heart });
        id
    }

    fn render_choices(&mut self, set: ChoiceSetId, labels: &[&'static str]) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::Choices {
            id,
            set,
            labels: labels.to_vec(),
        });
        id
    }

    fn render_notification(&mut self, text: &str) {
        self.record(PresentationEvent::Notification(text.to_string()));
    }

    fn render_board(&mut self) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::Board(id));
        id
    }

    fn render_board_cell(&mut self, position: Position, square: Square, fx: CellFx) {
        self.record(PresentationEvent::Cell {
            position,
            square,
            fx,
        });
    }

    fn render_game_status(&mut self, text: &str) {
        self.record(PresentationEvent::GameStatus(text.to_string()));
    }

    fn render_heart(&mut self) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::Heart(id));
        id
    }

    fn render_heart_status(&mut self, text: &str, taps: u32) {
        self.record(PresentationEvent::HeartStatus {
            text: text.to_string(),
            taps,
        });
    }

    fn render_reaction(&mut self, anchor: Anchor, glyph: &str) -> ElementId {
        let id = self.mount();
        self.record(PresentationEvent::Reaction {
            id,
            anchor,
            glyph: glyph.to_string(),
        });
        id
    }

    fn render_input_draft(&mut self, draft: Option<&str>, highlighted: bool) {
        self.record(PresentationEvent::InputDraft {
            draft: draft.map(str::to_string),
            highlighted,
        });
    }

    fn render_prompt(&mut self, prompt: &InputPrompt) {
        self.record(PresentationEvent::Prompt(prompt.clone()));
        if let Some(autopilot) = self.autopilot.as_mut() {
            autopilot.answer(prompt);
        }
    }

    fn render_chrome(&mut self, fx: ChromeFx) {
        self.record(PresentationEvent::Chrome(fx));
    }

    fn is_attached(&self, id: ElementId) -> bool {
        self.attached.contains(&id)
    }

    fn remove_element(&mut self, id: ElementId) {
        self.attached.remove(&id);
        self.record(PresentationEvent::Removed(id));
    }
}

/// Effects port that keeps a log of every call.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    events: Vec<EffectEvent>,
}

impl RecordingEffects {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every effect so far.
    pub fn events(&self) -> &[EffectEvent] {
        &self.events
    }
}

impl EffectsPort for RecordingEffects {
    fn confetti_burst(&mut self, origin: Anchor) {
        self.events.push(EffectEvent::ConfettiBurst(origin));
    }

    fn confetti_stream(&mut self, duration: Duration) {
        self.events.push(EffectEvent::ConfettiStream(duration));
    }

    fn floating_heart(&mut self, origin: Anchor, glyph: &str) {
        self.events
            .push(EffectEvent::FloatingHeart(origin, glyph.to_string()));
    }

    fn vibrate(&mut self, pattern: &[u64]) {
        self.events.push(EffectEvent::Vibrate(pattern.to_vec()));
    }
}
