//! What the terminal currently shows.

use crate::games::tictactoe::{Board, Position, Square};
use crate::ports::{Anchor, CellFx, ChromeFx, ElementId, InputPrompt};
use crate::script::{ChoiceSetId, Sender};
use tracing::debug;

/// One line of the chat log.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A chat bubble.
    Message {
        /// Element handle.
        id: ElementId,
        /// Bubble text.
        text: String,
        /// Bubble side.
        sender: Sender,
    },
    /// A centered notice.
    Notification(String),
}

/// The embedded game board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    /// Element handle.
    pub id: ElementId,
    /// Cells as last drawn.
    pub board: Board,
    /// Cell that last animated, and how.
    pub flash: Option<(Position, CellFx)>,
    /// Status line above the board.
    pub status: String,
}

/// The heart challenge widget.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartView {
    /// Element handle.
    pub id: ElementId,
    /// Status under the heart.
    pub status: String,
    /// Taps so far.
    pub taps: u32,
}

/// Everything the screen draws, with element bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatView {
    next_id: u64,
    /// Chat log, oldest first.
    pub entries: Vec<Entry>,
    /// Typing indicator and whether it has a heart dot.
    pub typing: Option<(ElementId, bool)>,
    /// Choice buttons on screen.
    pub choices: Option<(ElementId, ChoiceSetId, Vec<&'static str>)>,
    /// The game, once mounted.
    pub board: Option<BoardView>,
    /// The heart, once mounted.
    pub heart: Option<HeartView>,
    /// Reaction glyphs and where they are pinned.
    pub reactions: Vec<(ElementId, Anchor, String)>,
    /// Input affordance text and highlight.
    pub draft: Option<(String, bool)>,
    /// Most recent effect, drawn in the footer.
    pub flourish: Option<String>,
    /// Night mode on.
    pub night_mode: bool,
    /// Action sheet open.
    pub sheet_open: bool,
    /// Hidden character peeking.
    pub character_shown: bool,
    /// Input the flow is waiting for.
    pub prompt: Option<InputPrompt>,
    /// Keyboard cursor on the board.
    pub cursor: Position,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
            typing: None,
            choices: None,
            board: None,
            heart: None,
            reactions: Vec::new(),
            draft: None,
            flourish: None,
            night_mode: false,
            sheet_open: false,
            character_shown: false,
            prompt: None,
            cursor: Position::Center,
        }
    }
}

impl ChatView {
    /// Hands out a fresh element handle.
    pub fn mount(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    /// Appends a chat bubble.
    pub fn push_message(&mut self, text: &str, sender: Sender) -> ElementId {
        let id = self.mount();
        self.entries.push(Entry::Message {
            id,
            text: text.to_string(),
            sender,
        });
        id
    }

    /// The newest bubble, the target of a keyboard bubble tap.
    pub fn last_bubble(&self) -> Option<ElementId> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::Message { id, .. } => Some(*id),
            Entry::Notification(_) => None,
        })
    }

    /// Draws one cell, mounting nothing.
    pub fn set_cell(&mut self, position: Position, square: Square, fx: CellFx) {
        match self.board.as_mut() {
            Some(view) => {
                view.board.set(position, square);
                view.flash = (fx != CellFx::Plain).then_some((position, fx));
            }
            None => debug!(%position, "cell drawn without a board"),
        }
    }

    /// Applies a chrome change.
    pub fn apply_chrome(&mut self, fx: ChromeFx) {
        match fx {
            ChromeFx::ShakeBack => self.flourish = Some("↩︎ (the back button wobbles)".to_string()),
            ChromeFx::NightMode(on) => self.night_mode = on,
            ChromeFx::ActionSheet(open) => self.sheet_open = open,
            ChromeFx::HiddenCharacter(shown) => self.character_shown = shown,
        }
    }

    /// Whether `id` names something still on screen.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.typing.is_some_and(|(t, _)| t == id)
            || self.choices.as_ref().is_some_and(|(c, _, _)| *c == id)
            || self.board.as_ref().is_some_and(|b| b.id == id)
            || self.heart.as_ref().is_some_and(|h| h.id == id)
            || self.reactions.iter().any(|(r, _, _)| *r == id)
            || self
                .entries
                .iter()
                .any(|e| matches!(e, Entry::Message { id: m, .. } if *m == id))
    }

    /// Takes `id` off screen.
    pub fn remove(&mut self, id: ElementId) {
        if self.typing.is_some_and(|(t, _)| t == id) {
            self.typing = None;
        }
        if self.choices.as_ref().is_some_and(|(c, _, _)| *c == id) {
            self.choices = None;
        }
        if self.board.as_ref().is_some_and(|b| b.id == id) {
            self.board = None;
        }
        if self.heart.as_ref().is_some_and(|h| h.id == id) {
            self.heart = None;
        }
        self.reactions.retain(|(r, _, _)| *r != id);
        self.entries
            .retain(|e| !matches!(e, Entry::Message { id: m, .. } if *m == id));
    }

    /// Reaction glyphs pinned to `anchor`.
    pub fn reactions_at(&self, anchor: Anchor) -> impl Iterator<Item = &str> {
        self.reactions
            .iter()
            .filter(move |(_, a, _)| *a == anchor)
            .map(|(_, _, glyph)| glyph.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_elements_are_detached() {
        let mut view = ChatView::default();
        let bubble = view.push_message("hi", Sender::Received);
        let typing = view.mount();
        view.typing = Some((typing, false));

        assert!(view.is_attached(bubble));
        assert!(view.is_attached(typing));

        view.remove(typing);
        assert!(!view.is_attached(typing));
        assert_eq!(view.last_bubble(), Some(bubble));

        view.remove(bubble);
        assert!(view.entries.is_empty());
        assert_eq!(view.last_bubble(), None);
    }

    #[test]
    fn test_cell_flash_only_for_animated_cells() {
        let mut view = ChatView::default();
        let id = view.mount();
        view.board = Some(BoardView {
            id,
            board: Board::new(),
            flash: None,
            status: String::new(),
        });
        view.set_cell(Position::Center, Square::Empty, CellFx::Stolen);
        assert_eq!(
            view.board.as_ref().and_then(|b| b.flash),
            Some((Position::Center, CellFx::Stolen))
        );
        view.set_cell(Position::TopLeft, Square::Empty, CellFx::Plain);
        assert_eq!(view.board.as_ref().and_then(|b| b.flash), None);
    }
}
