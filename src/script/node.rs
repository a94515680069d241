//! Declarative script nodes.

use super::choice::ChoiceSet;
use derive_new::new;
use std::time::Duration;

/// Who a chat bubble comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Sender {
    /// Centered system notice.
    System,
    /// The other side of the chat, preceded by a typing indicator.
    Received,
    /// The person chatting.
    Sent,
}

/// Stable name of a script node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum NodeId {
    /// "Hey… can I ask you something?"
    Greeting,
    /// "Are you free this weekend?"
    Weekend,
    /// Lead-in to the heart challenge.
    HeartChallenge,
    /// Taunts before the game.
    GameChallenge,
    /// The join point both sub-flows resume into.
    LastQuestion,
    /// The human's enthusiastic yes.
    YesReply,
    /// Confetti and the final message.
    Celebration,
}

/// One message of a node, with its timing.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ScriptMessage {
    /// Bubble text.
    pub text: &'static str,
    /// Who sends it.
    pub sender: Sender,
    /// Pause before anything is shown.
    pub pre_delay: Duration,
    /// Typing indicator time; only used for [`Sender::Received`].
    pub typing: Duration,
}

impl ScriptMessage {
    /// A received message with the usual one second of typing.
    pub fn received(text: &'static str, pre_delay_ms: u64) -> Self {
        Self::new(
            text,
            Sender::Received,
            Duration::from_millis(pre_delay_ms),
            Duration::from_millis(1000),
        )
    }

    /// A sent message, shown immediately.
    pub fn sent(text: &'static str) -> Self {
        Self::new(text, Sender::Sent, Duration::ZERO, Duration::ZERO)
    }

    /// Overrides the typing duration.
    pub fn typing_for(mut self, typing_ms: u64) -> Self {
        self.typing = Duration::from_millis(typing_ms);
        self
    }
}

/// Something fired when a node is entered, before its messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A stream of confetti from both sides of the screen.
    ConfettiStream(Duration),
}

/// Embedded sub-flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubFlow {
    /// The rigged game.
    TicTacToe {
        /// Sent after a reported loss.
        on_loss: ScriptMessage,
        /// Sent after a reported win (unreachable under the rigging).
        on_win: ScriptMessage,
    },
    /// Tap the big heart until it bursts.
    HeartTap {
        /// Sent once the heart bursts.
        epilogue: ScriptMessage,
    },
}

/// What follows a node once its messages are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Successor {
    /// Continue to another node.
    Next(NodeId),
    /// Wait for the person to choose.
    Choices(ChoiceSet),
    /// Run a sub-flow, then resume at `join`.
    SubFlow {
        /// The sub-flow to run.
        flow: SubFlow,
        /// Where the main line picks up.
        join: NodeId,
    },
    /// The unbounded celebration.
    Idle,
}

/// One authored step of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ScriptNode {
    /// Node name.
    pub id: NodeId,
    /// Fired on entry.
    #[new(default)]
    pub cue: Option<Cue>,
    /// Messages, delivered in order.
    pub messages: Vec<ScriptMessage>,
    /// What comes next.
    pub successor: Successor,
}

impl ScriptNode {
    /// Attaches an entry cue.
    pub fn with_cue(mut self, cue: Cue) -> Self {
        self.cue = Some(cue);
        self
    }
}
