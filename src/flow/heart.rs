//! The heart-tap challenge.

use super::session::FlowSession;
use crate::ports::{Anchor, EffectsPort, InputPrompt, PresentationPort, UserInput};
use tracing::{debug, info, instrument};

/// Status under the heart after `taps` taps, before it bursts.
fn tap_status(taps: u32) -> &'static str {
    match taps {
        0 => "Tap it!",
        1 => "Faster! 😏",
        2 => "Ooooh… I can feel it! 🥰",
        3 => "Your heart is racing… 💖",
        _ => "Almost there! 🔥",
    }
}

impl<P, E> FlowSession<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Waits for the configured number of heart taps.
    ///
    /// Returns `false` if input closes first. Taps after the burst are never
    /// read, so they do nothing.
    #[instrument(skip(self), fields(required = self.required_taps))]
    pub async fn tap_heart(&mut self) -> bool {
        let required = self.required_taps.max(1);
        self.presentation.render_heart();
        self.presentation.render_heart_status(tap_status(0), 0);

        let mut taps = 0;
        while taps < required {
            self.presentation.render_prompt(&InputPrompt::Heart {
                remaining: required - taps,
            });
            let Some(input) = self.next_input().await else {
                return false;
            };
            if input != UserInput::TapHeart {
                debug!(?input, "not a heart tap, ignored");
                continue;
            }

            taps += 1;
            self.effects.vibrate(&[50]);
            self.float_heart(Anchor::Heart);
            if taps < required {
                self.presentation.render_heart_status(tap_status(taps), taps);
            }
        }

        self.presentation.render_heart_status("DONE! 💥", taps);
        self.effects.confetti_burst(Anchor::Heart);
        info!(taps, "heart burst");
        true
    }
}
