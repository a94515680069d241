//! Ambient input: optional chrome and bubble easter eggs.
//!
//! These never move the cursor. They are handled whenever the session is
//! waiting, whatever the conversation is doing.

use super::deferred::Deferred;
use super::session::FlowSession;
use crate::ports::{Anchor, ChromeEvent, ChromeFx, EffectsPort, ElementId, PresentationPort, UserInput};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Two taps on one bubble closer than this are a double tap.
const DOUBLE_TAP: Duration = Duration::from_millis(300);

/// Single taps on one bubble needed to reveal the hidden character.
const MULTI_TAP: u32 = 3;

/// How long the hidden character peeks out.
const CHARACTER_PEEK: Duration = Duration::from_millis(2000);

/// How long the video-call notice blocks repeats.
const VIDEO_CALL_COOLDOWN: Duration = Duration::from_millis(3000);

/// Glyphs a double tap picks from.
const BUBBLE_REACTIONS: [&str; 4] = ["❤️", "🔥", "😆", "😮"];

/// Toggles and cooldowns of the optional chrome.
#[derive(Debug, Default)]
pub struct ChromeState {
    night_mode: bool,
    sheet_open: bool,
    character_shown: bool,
    video_call_at: Option<Instant>,
}

#[derive(Debug, Default, Clone, Copy)]
struct BubbleTap {
    count: u32,
    last: Option<Instant>,
}

/// Per-bubble tap history.
#[derive(Debug, Default)]
pub struct BubbleTaps {
    taps: HashMap<ElementId, BubbleTap>,
}

impl<P, E> FlowSession<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Handles ambient input. Directed input is handed back untouched.
    pub(super) fn absorb(&mut self, input: UserInput) -> Option<UserInput> {
        match input {
            UserInput::TapBubble(id) => {
                self.tap_bubble(id);
                None
            }
            UserInput::Chrome(event) => {
                self.chrome_event(event);
                None
            }
            directed => Some(directed),
        }
    }

    #[instrument(skip(self))]
    fn tap_bubble(&mut self, id: ElementId) {
        if !self.presentation.is_attached(id) {
            debug!("tap on a detached bubble");
            return;
        }
        let now = Instant::now();
        let mut tap = self.bubbles.taps.get(&id).copied().unwrap_or_default();
        let anchor = Anchor::Element(id);

        if tap.last.is_some_and(|last| now.duration_since(last) < DOUBLE_TAP) {
            let glyph = BUBBLE_REACTIONS.choose(&mut self.rng).copied().unwrap_or("❤️");
            self.react(anchor, glyph);
            self.effects.confetti_burst(anchor);
            tap.count = 0;
        } else {
            tap.count += 1;
        }

        if tap.count >= MULTI_TAP {
            self.float_heart(anchor);
            self.show_character();
            tap.count = 0;
        }

        tap.last = Some(now);
        self.bubbles.taps.insert(id, tap);
    }

    #[instrument(skip(self))]
    fn chrome_event(&mut self, event: ChromeEvent) {
        let present = match event {
            ChromeEvent::Back => self.listeners.back_button,
            ChromeEvent::VideoCall => self.listeners.video_call,
            ChromeEvent::HeaderLongPress => self.listeners.header,
            ChromeEvent::Footer | ChromeEvent::SheetCancel => self.listeners.footer,
        };
        if !present {
            debug!("no listener for absent chrome");
            return;
        }

        match event {
            ChromeEvent::Back => {
                self.effects.vibrate(&[10]);
                self.presentation.render_chrome(ChromeFx::ShakeBack);
            }
            ChromeEvent::VideoCall => {
                let now = Instant::now();
                if self
                    .chrome
                    .video_call_at
                    .is_some_and(|at| now.duration_since(at) < VIDEO_CALL_COOLDOWN)
                {
                    debug!("video call notice cooling down");
                    return;
                }
                self.chrome.video_call_at = Some(now);
                self.effects.vibrate(&[10]);
                self.presentation.render_notification("Video call unavailable");
            }
            ChromeEvent::HeaderLongPress => {
                self.chrome.night_mode = !self.chrome.night_mode;
                self.presentation
                    .render_chrome(ChromeFx::NightMode(self.chrome.night_mode));
                self.effects.vibrate(&[50, 50, 50]);
            }
            ChromeEvent::Footer => {
                self.chrome.sheet_open = true;
                self.presentation.render_chrome(ChromeFx::ActionSheet(true));
                self.effects.vibrate(&[10]);
            }
            ChromeEvent::SheetCancel => {
                if self.chrome.sheet_open {
                    self.chrome.sheet_open = false;
                    self.presentation.render_chrome(ChromeFx::ActionSheet(false));
                }
            }
        }
    }

    fn show_character(&mut self) {
        if !self.listeners.hidden_character {
            return;
        }
        self.chrome.character_shown = true;
        self.presentation.render_chrome(ChromeFx::HiddenCharacter(true));
        self.defer(CHARACTER_PEEK, Deferred::HideCharacter);
    }

    /// Hides the peeking character if it is still out.
    pub(super) fn hide_character(&mut self) {
        if std::mem::take(&mut self.chrome.character_shown) {
            self.presentation.render_chrome(ChromeFx::HiddenCharacter(false));
        }
    }
}
