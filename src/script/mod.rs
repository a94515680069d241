//! The conversation as data.
//!
//! A [`Script`] is a fixed table of [`ScriptNode`]s keyed by [`NodeId`].
//! It is built once and never mutated; all progress lives in the flow
//! controller's cursor.

mod choice;
mod node;
pub mod valentine;

pub use choice::{ArmedChoices, Choice, ChoiceAction, ChoiceLatch, ChoiceSet, ChoiceSetId};
pub use node::{Cue, NodeId, ScriptMessage, ScriptNode, Sender, SubFlow, Successor};

use std::collections::HashMap;

/// A complete, statically well-formed conversation.
#[derive(Debug, Clone)]
pub struct Script {
    entry: NodeId,
    nodes: HashMap<NodeId, ScriptNode>,
}

impl Script {
    /// Builds a script from its entry point and nodes.
    ///
    /// A later node with the same id replaces an earlier one.
    pub fn new(entry: NodeId, nodes: Vec<ScriptNode>) -> Self {
        Self {
            entry,
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
        }
    }

    /// Where the conversation starts.
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&ScriptNode> {
        self.nodes.get(&id)
    }
}
