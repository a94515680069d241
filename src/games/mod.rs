//! Games embedded in the conversation.

pub mod tictactoe;
