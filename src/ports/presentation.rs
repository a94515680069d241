//! Rendering port.
//!
//! The flow never touches a display surface directly. Everything it shows
//! goes through a [`PresentationPort`]; anything transient comes back as an
//! [`ElementId`] that must be checked with [`PresentationPort::is_attached`]
//! before it is removed (see [`release`]).

use crate::games::tictactoe::{Board, Position, Square};
use crate::script::{ChoiceSetId, Sender};
use tracing::debug;

/// Handle to a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("el#{}", _0)]
pub struct ElementId(pub u64);

/// Where an effect or reaction is anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// A board cell.
    Cell(Position),
    /// The whole board.
    Board,
    /// The big heart of the heart challenge.
    Heart,
    /// A previously rendered element, usually a bubble.
    Element(ElementId),
    /// A point on screen, as fractions of width and height.
    Screen {
        /// 0.0 is the left edge.
        x: f32,
        /// 0.0 is the top edge.
        y: f32,
    },
}

/// One-shot animation on a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFx {
    /// Just the mark.
    Plain,
    /// The celebratory wiggle on a would-be winning mark.
    Wiggle,
    /// Flash and wink: the cell was just stolen.
    Stolen,
}

/// What the flow is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPrompt {
    /// A choice set is armed.
    Choices {
        /// Which presentation.
        set: ChoiceSetId,
        /// Labels in order.
        labels: Vec<&'static str>,
    },
    /// The board accepts a cell.
    Board(Board),
    /// The heart accepts taps.
    Heart {
        /// Taps still needed.
        remaining: u32,
    },
}

/// Optional chrome present on the surface.
///
/// Anything reported absent has its listener skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeFeatures {
    /// Back arrow in the header.
    pub back_button: bool,
    /// Video-call icon in the header.
    pub video_call: bool,
    /// Header that toggles night mode on long press.
    pub header: bool,
    /// Footer link that opens the action sheet.
    pub footer: bool,
    /// Text input affordance used by autocorrect.
    pub input_field: bool,
    /// Peeking character revealed by bubble taps.
    pub hidden_character: bool,
}

impl ChromeFeatures {
    /// Every optional element present.
    pub fn all() -> Self {
        Self {
            back_button: true,
            video_call: true,
            header: true,
            footer: true,
            input_field: true,
            hidden_character: true,
        }
    }
}

/// Chrome-level visual changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeFx {
    /// Shake the back button.
    ShakeBack,
    /// Night mode on or off.
    NightMode(bool),
    /// Action sheet open or closed.
    ActionSheet(bool),
    /// Hidden character shown or hidden.
    HiddenCharacter(bool),
}

/// Imperative rendering calls made by the flow and the game.
pub trait PresentationPort {
    /// Which optional chrome exists.
    fn chrome(&self) -> ChromeFeatures;

    /// Appends a chat bubble.
    fn render_message(&mut self, text: &str, sender: Sender) -> ElementId;

    /// Shows the typing indicator, optionally with a heart dot.
    fn render_typing_indicator(&mut self, heart: bool) -> ElementId;

    /// Shows a choice set.
    fn render_choices(&mut self, set: ChoiceSetId, labels: &[&'static str]) -> ElementId;

    /// Centered system notification.
    fn render_notification(&mut self, text: &str);

    /// Mounts an empty board.
    fn render_board(&mut self) -> ElementId;

    /// Draws one cell.
    fn render_board_cell(&mut self, position: Position, square: Square, fx: CellFx);

    /// Status line above the board.
    fn render_game_status(&mut self, text: &str);

    /// Mounts the big heart.
    fn render_heart(&mut self) -> ElementId;

    /// Status under the heart, after `taps` taps.
    fn render_heart_status(&mut self, text: &str, taps: u32);

    /// Small emoji reaction pinned to an anchor.
    fn render_reaction(&mut self, anchor: Anchor, glyph: &str) -> ElementId;

    /// Contents of the input affordance; `None` restores the placeholder.
    fn render_input_draft(&mut self, draft: Option<&str>, highlighted: bool);

    /// Tells the surface what input is expected now.
    fn render_prompt(&mut self, prompt: &InputPrompt);

    /// Chrome-level change.
    fn render_chrome(&mut self, fx: ChromeFx);

    /// Whether an element is still on screen.
    fn is_attached(&self, id: ElementId) -> bool;

    /// Removes an element. Only called for attached elements.
    fn remove_element(&mut self, id: ElementId);
}

/// Removes `id` if it is still attached. Returns whether anything was removed.
///
/// Removing an element twice, or one the surface already dropped, is a no-op.
pub fn release<P: PresentationPort + ?Sized>(port: &mut P, id: ElementId) -> bool {
    if port.is_attached(id) {
        port.remove_element(id);
        true
    } else {
        debug!(%id, "element already detached");
        false
    }
}
