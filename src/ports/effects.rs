//! Fire-and-forget effects: confetti, hearts, haptics.

use super::presentation::Anchor;
use std::time::Duration;

/// Effects whose results are never read back.
pub trait EffectsPort {
    /// Small burst of confetti.
    fn confetti_burst(&mut self, origin: Anchor);

    /// Confetti raining from both sides for `duration`.
    fn confetti_stream(&mut self, duration: Duration);

    /// A heart glyph floating up from `origin`.
    fn floating_heart(&mut self, origin: Anchor, glyph: &str);

    /// Vibration pattern in milliseconds (on, off, on, ...).
    fn vibrate(&mut self, pattern: &[u64]);
}
