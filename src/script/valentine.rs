//! The authored Valentine conversation.

use super::choice::{Choice, ChoiceAction, ChoiceSet};
use super::node::{Cue, NodeId, ScriptMessage, ScriptNode, SubFlow, Successor};
use super::Script;
use std::time::Duration;

/// Builds the full conversation, starting at [`NodeId::Greeting`].
pub fn script() -> Script {
    Script::new(
        NodeId::Greeting,
        vec![
            ScriptNode::new(
                NodeId::Greeting,
                vec![ScriptMessage::received("Hey… can I ask you something? 💌", 1000)],
                Successor::Choices(ChoiceSet::new(vec![
                    Choice::new("Sure! 😊", ChoiceAction::Advance(NodeId::Weekend)),
                    Choice::new("What is it? 🤔", ChoiceAction::Advance(NodeId::Weekend)),
                ])),
            ),
            ScriptNode::new(
                NodeId::Weekend,
                vec![ScriptMessage::received("Are you free this weekend?", 1200)],
                Successor::Choices(ChoiceSet::new(vec![
                    Choice::new("Yep!", ChoiceAction::Advance(NodeId::LastQuestion)),
                    Choice::new("Maybe...", ChoiceAction::Advance(NodeId::HeartChallenge)),
                    Choice::new("No", ChoiceAction::Advance(NodeId::GameChallenge)),
                ])),
            ),
            ScriptNode::new(
                NodeId::HeartChallenge,
                vec![ScriptMessage::received(
                    "Maybe? Hmm… let’s see how much your heart wants it! 💓 Tap the heart!",
                    600,
                )],
                Successor::SubFlow {
                    flow: SubFlow::HeartTap {
                        epilogue: ScriptMessage::received(
                            "Haha, looks like your heart has something to say! 😆",
                            500,
                        ),
                    },
                    join: NodeId::LastQuestion,
                },
            ),
            ScriptNode::new(
                NodeId::GameChallenge,
                vec![
                    ScriptMessage::received("Not free? We'll see about that! 😈", 800),
                    ScriptMessage::received("Beat me at Tic-Tac-Toe and I'll let you go! 🎲", 1000),
                ],
                Successor::SubFlow {
                    flow: SubFlow::TicTacToe {
                        on_loss: ScriptMessage::received("I win! You have to listen now! 😎", 500),
                        on_win: ScriptMessage::received("Okay okay, you win... but wait!", 500),
                    },
                    join: NodeId::LastQuestion,
                },
            ),
            ScriptNode::new(
                NodeId::LastQuestion,
                vec![
                    ScriptMessage::received("Okay, last question... 🙈", 1000),
                    ScriptMessage::received("Will you be my Valentine? 💖", 2000).typing_for(2000),
                ],
                Successor::Choices(ChoiceSet::new(vec![
                    Choice::new("YES! 🥰", ChoiceAction::Advance(NodeId::YesReply)).silent(),
                    Choice::new(
                        "No...",
                        ChoiceAction::Autocorrect {
                            typed: "No...",
                            target: "YES YES YES !!",
                            reaction: None,
                            settle: Duration::from_millis(1000),
                            then: NodeId::Celebration,
                        },
                    )
                    .silent(),
                ])),
            ),
            ScriptNode::new(
                NodeId::YesReply,
                vec![ScriptMessage::sent("YES YES YES! 🥰")],
                Successor::Next(NodeId::Celebration),
            ),
            ScriptNode::new(
                NodeId::Celebration,
                vec![ScriptMessage::received("YAY! See you this weekend! 😘❤️", 600)],
                Successor::Idle,
            )
            .with_cue(Cue::ConfettiStream(Duration::from_millis(3000))),
        ],
    )
}
