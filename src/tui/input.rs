//! Keyboard to [`UserInput`] mapping.

use crate::games::tictactoe::Position;
use crate::ports::{ChromeEvent, ElementId, InputPrompt, UserInput};
use crossterm::event::KeyCode;

/// What a key press amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Feed this to the flow.
    Send(UserInput),
    /// Only the cursor moved.
    Redraw,
    /// Leave the program.
    Quit,
    /// Nothing.
    Ignore,
}

/// Moves cursor based on arrow keys.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = cursor.row_col();
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

/// Maps a key to an action given what the flow is waiting for.
///
/// Chrome and bubble keys work at any time. Digits, arrows, Enter and Space
/// depend on the current prompt.
pub fn map_key(
    key: KeyCode,
    prompt: Option<&InputPrompt>,
    cursor: &mut Position,
    last_bubble: Option<ElementId>,
) -> KeyAction {
    match key {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('b') => return KeyAction::Send(UserInput::Chrome(ChromeEvent::Back)),
        KeyCode::Char('v') => return KeyAction::Send(UserInput::Chrome(ChromeEvent::VideoCall)),
        KeyCode::Char('n') => {
            return KeyAction::Send(UserInput::Chrome(ChromeEvent::HeaderLongPress));
        }
        KeyCode::Char('m') => return KeyAction::Send(UserInput::Chrome(ChromeEvent::Footer)),
        KeyCode::Esc => return KeyAction::Send(UserInput::Chrome(ChromeEvent::SheetCancel)),
        KeyCode::Char('t') => {
            return last_bubble.map_or(KeyAction::Ignore, |id| {
                KeyAction::Send(UserInput::TapBubble(id))
            });
        }
        _ => {}
    }

    match (prompt, key) {
        (Some(InputPrompt::Choices { set, labels }), KeyCode::Char(c)) => match digit(c) {
            Some(index) if index < labels.len() => KeyAction::Send(UserInput::Choose {
                set: *set,
                index,
            }),
            _ => KeyAction::Ignore,
        },
        (Some(InputPrompt::Board(_)), KeyCode::Char(c)) => digit(c)
            .and_then(Position::from_index)
            .map_or(KeyAction::Ignore, |pos| KeyAction::Send(UserInput::TapCell(pos))),
        (Some(InputPrompt::Board(_)), KeyCode::Enter) => {
            KeyAction::Send(UserInput::TapCell(*cursor))
        }
        (Some(InputPrompt::Board(_)), KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right) => {
            *cursor = move_cursor(*cursor, key);
            KeyAction::Redraw
        }
        (Some(InputPrompt::Heart { .. }), KeyCode::Enter | KeyCode::Char(' ')) => {
            KeyAction::Send(UserInput::TapHeart)
        }
        _ => KeyAction::Ignore,
    }
}

/// `'1'..='9'` as a zero-based index.
fn digit(c: char) -> Option<usize> {
    c.to_digit(10)
        .filter(|d| (1..=9).contains(d))
        .map(|d| d as usize - 1)
}
