//! Input events fed to the flow.

use super::presentation::ElementId;
use crate::games::tictactoe::Position;
use crate::script::ChoiceSetId;

/// Optional chrome the person can poke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeEvent {
    /// Back arrow tapped.
    Back,
    /// Video-call icon tapped.
    VideoCall,
    /// Header held down long enough.
    HeaderLongPress,
    /// Footer link tapped.
    Footer,
    /// Action sheet cancel tapped.
    SheetCancel,
}

/// Something the person did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    /// Picked option `index` of choice set `set`.
    Choose {
        /// Which presentation the click was aimed at.
        set: ChoiceSetId,
        /// Option index.
        index: usize,
    },
    /// Tapped a board cell.
    TapCell(Position),
    /// Tapped the big heart.
    TapHeart,
    /// Tapped a chat bubble.
    TapBubble(ElementId),
    /// Poked some chrome.
    Chrome(ChromeEvent),
}
