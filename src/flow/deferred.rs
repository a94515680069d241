//! Deferred UI mutations.
//!
//! Cleanup that must not block the conversation (fading choice buttons,
//! expiring reactions, hiding the peeking character) is queued here and
//! flushed by the session whenever it suspends or waits for input. Each
//! action is re-checked against the surface when it fires.

use crate::ports::ElementId;
use tokio::time::Instant;

/// A queued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Remove an element, if it is still attached.
    Release(ElementId),
    /// Hide the peeking character.
    HideCharacter,
}

/// Time-ordered queue of deferred mutations.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    items: Vec<(Instant, Deferred)>,
}

impl DeferredQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to fire at `at`.
    pub fn schedule(&mut self, at: Instant, action: Deferred) {
        let index = self.items.partition_point(|(due, _)| *due <= at);
        self.items.insert(index, (at, action));
    }

    /// Earliest deadline, if anything is queued.
    pub fn next_due(&self) -> Option<Instant> {
        self.items.first().map(|(due, _)| *due)
    }

    /// Removes and returns everything due at or before `now`, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Deferred> {
        let split = self.items.partition_point(|(due, _)| *due <= now);
        self.items.drain(..split).map(|(_, action)| action).collect()
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
