//! One-shot choice sets.

use super::node::{NodeId, ScriptMessage};
use derive_new::new;
use std::time::Duration;

/// Identifies one presentation of a choice set.
///
/// Every time a set is shown it gets a fresh id, so a stale selection aimed at
/// an earlier set can never land on a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("choices#{}", _0)]
pub struct ChoiceSetId(pub u64);

/// What a choice does once selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceAction {
    /// Continue at a node.
    Advance(NodeId),
    /// Retype the person's answer into something better, then continue.
    Autocorrect {
        /// What appears to be typed first.
        typed: &'static str,
        /// What it is corrected to and sent as.
        target: &'static str,
        /// Optional reply to the correction.
        reaction: Option<ScriptMessage>,
        /// Pause after the correction before continuing.
        settle: Duration,
        /// Where to continue.
        then: NodeId,
    },
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Choice {
    /// Button label.
    pub label: &'static str,
    /// When set, selecting does not echo the label as a sent message.
    #[new(default)]
    pub skip_message: bool,
    /// What happens on selection.
    pub action: ChoiceAction,
}

impl Choice {
    /// Suppresses the echoed sent message.
    pub fn silent(mut self) -> Self {
        self.skip_message = true;
        self
    }
}

/// Ordered, mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Builds a set from its options, in display order.
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    /// Options in display order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.choices.iter().map(|c| c.label).collect()
    }

    /// Option at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}

/// The shared "consumed" flag of an armed choice set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceLatch {
    consumed: bool,
}

impl ChoiceLatch {
    /// A fresh, unconsumed latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the latch. Only the first call returns `true`.
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    /// Whether a selection has already been taken.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A choice set currently on screen and waiting for input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedChoices {
    /// Which presentation this is.
    pub id: ChoiceSetId,
    /// Shared latch for all options in the set.
    pub latch: ChoiceLatch,
}
