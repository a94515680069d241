//! The explicit context every flow operation runs against.
//!
//! A [`FlowSession`] owns the injected ports, the input receiver, the
//! deferred-mutation queue, the pacing and the seeded rng. There is no
//! ambient state: the cursor lives in the controller, the armed choice latch
//! lives here, and both are only touched through `&mut self`.

use super::chrome::{BubbleTaps, ChromeState};
use super::deferred::{Deferred, DeferredQueue};
use crate::config::{FlowConfig, Pacing};
use crate::games::tictactoe::OutcomePolicy;
use crate::ports::{
    Anchor, ChromeFeatures, EffectsPort, ElementId, InputPrompt, PresentationPort, UserInput,
    release,
};
use crate::script::{ArmedChoices, Choice, ChoiceLatch, ChoiceSet, ChoiceSetId, ScriptMessage, Sender};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, trace};

/// Glyphs a floating heart is drawn from.
pub const FLOATING_HEARTS: [&str; 4] = ["💖", "🥰", "💌", "💕"];

/// Chance that a typing indicator shows a heart dot.
const HEART_TYPING_CHANCE: f64 = 0.3;

/// How long a finished choice set lingers before it is removed.
const CHOICES_FADE: Duration = Duration::from_millis(400);

/// How long a reaction glyph stays up.
const REACTION_TTL: Duration = Duration::from_millis(1000);

/// Conversation context: ports, input, timers and randomness.
pub struct FlowSession<P, E> {
    pub(super) presentation: P,
    pub(super) effects: E,
    input: UnboundedReceiver<UserInput>,
    input_closed: bool,
    deferred: DeferredQueue,
    pacing: Pacing,
    pub(super) rng: StdRng,
    armed: Option<ArmedChoices>,
    next_set: u64,
    pub(super) listeners: ChromeFeatures,
    pub(super) chrome: ChromeState,
    pub(super) bubbles: BubbleTaps,
    reactions: Vec<(Anchor, ElementId)>,
    pub(super) policy: OutcomePolicy,
    pub(super) required_taps: u32,
}

impl<P, E> FlowSession<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Builds a session around the given ports.
    ///
    /// Optional chrome is probed once here; listeners for anything reported
    /// absent are never registered.
    #[instrument(skip_all, fields(seed = ?config.seed()))]
    pub fn new(
        presentation: P,
        effects: E,
        input: UnboundedReceiver<UserInput>,
        config: &FlowConfig,
    ) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_entropy(),
        };
        let listeners = presentation.chrome();
        info!(?listeners, "flow session ready");
        Self {
            presentation,
            effects,
            input,
            input_closed: false,
            deferred: DeferredQueue::new(),
            pacing: *config.pacing(),
            rng,
            armed: None,
            next_set: 0,
            listeners,
            chrome: ChromeState::default(),
            bubbles: BubbleTaps::default(),
            reactions: Vec::new(),
            policy: *config.game(),
            required_taps: config.heart().required_taps,
        }
    }

    /// The presentation port.
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// The effects port.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Whether the input source has closed.
    pub fn input_closed(&self) -> bool {
        self.input_closed
    }

    /// The choice set currently awaiting a selection, if any.
    pub fn armed(&self) -> Option<&ArmedChoices> {
        self.armed.as_ref()
    }

    /// Waits out a scripted delay.
    ///
    /// Deferred mutations fire on time and ambient input (bubble taps,
    /// chrome) is handled while waiting. Directed input that arrives now is
    /// stale and dropped.
    pub async fn suspend(&mut self, delay: Duration) {
        let deadline = Instant::now() + self.pacing.scale(delay);
        loop {
            self.flush_deferred();
            if Instant::now() >= deadline {
                return;
            }
            let wake = self
                .deferred
                .next_due()
                .map_or(deadline, |due| due.min(deadline));

            if self.input_closed {
                sleep_until(wake).await;
                continue;
            }

            let received = tokio::select! {
                _ = sleep_until(wake) => None,
                input = self.input.recv() => Some(input),
            };
            match received {
                None => {}
                Some(Some(input)) => {
                    if let Some(stale) = self.absorb(input) {
                        debug!(?stale, "input while busy, ignored");
                    }
                }
                Some(None) => self.close_input(),
            }
        }
    }

    /// Waits for the next directed input (a choice, a cell, a heart tap).
    ///
    /// Returns `None` once the input source has closed.
    pub async fn next_input(&mut self) -> Option<UserInput> {
        loop {
            self.flush_deferred();
            if self.input_closed {
                return None;
            }
            let due = self.deferred.next_due();

            let received = tokio::select! {
                _ = sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => None,
                input = self.input.recv() => Some(input),
            };
            match received {
                None => {}
                Some(Some(input)) => {
                    if let Some(directed) = self.absorb(input) {
                        return Some(directed);
                    }
                }
                Some(None) => self.close_input(),
            }
        }
    }

    /// Queues a mutation to run after `after` (scaled by pacing).
    pub fn defer(&mut self, after: Duration, action: Deferred) {
        let at = Instant::now() + self.pacing.scale(after);
        trace!(?action, "deferred");
        self.deferred.schedule(at, action);
    }

    /// Delivers one scripted message.
    ///
    /// Waits the pre-delay; received messages then show a typing indicator
    /// for their typing time, which is released only if still attached.
    /// Ends with the bubble and a short haptic pulse.
    #[instrument(skip_all, fields(sender = %message.sender))]
    pub async fn deliver_message(&mut self, message: &ScriptMessage) -> ElementId {
        self.suspend(message.pre_delay).await;

        if message.sender == Sender::Received {
            let heart = self.rng.gen_bool(HEART_TYPING_CHANCE);
            let indicator = self.presentation.render_typing_indicator(heart);
            self.suspend(message.typing).await;
            release(&mut self.presentation, indicator);
        }

        let id = self.presentation.render_message(message.text, message.sender);
        self.effects.vibrate(&[10]);
        debug!(%id, text = message.text, "message delivered");
        id
    }

    /// Shows a choice set and waits for exactly one selection.
    ///
    /// The set gets a fresh id and its own latch. Selections aimed at another
    /// set, out of range, or after the latch is consumed are dropped. The
    /// winning label is echoed as a sent message unless the choice is silent.
    /// Removal of the buttons is deferred so it never holds up what follows.
    ///
    /// Returns `None` if input closes first.
    #[instrument(skip_all, fields(options = set.choices().len()))]
    pub async fn present_choices(&mut self, set: &ChoiceSet) -> Option<Choice> {
        self.next_set += 1;
        let id = ChoiceSetId(self.next_set);
        let labels = set.labels();
        let container = self.presentation.render_choices(id, &labels);
        self.armed = Some(ArmedChoices {
            id,
            latch: ChoiceLatch::new(),
        });
        self.presentation
            .render_prompt(&InputPrompt::Choices { set: id, labels });

        let choice = loop {
            let input = self.next_input().await?;
            let UserInput::Choose { set: target, index } = input else {
                debug!(?input, "not a choice, ignored");
                continue;
            };
            let Some(choice) = set.get(index) else {
                debug!(index, "choice out of range, ignored");
                continue;
            };
            let Some(armed) = self.armed.as_mut().filter(|a| a.id == target) else {
                debug!(%target, "selection for another choice set, ignored");
                continue;
            };
            if !armed.latch.consume() {
                debug!(%target, "choice set already consumed");
                continue;
            }
            self.armed = None;
            break choice.clone();
        };

        info!(%id, label = choice.label, "choice selected");
        self.defer(CHOICES_FADE, Deferred::Release(container));
        if !choice.skip_message {
            self.deliver_message(&ScriptMessage::sent(choice.label)).await;
        }
        Some(choice)
    }

    /// Pins a reaction glyph to `anchor`, replacing any reaction already
    /// there, and schedules its removal.
    pub fn react(&mut self, anchor: Anchor, glyph: &str) -> ElementId {
        if let Some(index) = self.reactions.iter().position(|(a, _)| *a == anchor) {
            let (_, previous) = self.reactions.swap_remove(index);
            release(&mut self.presentation, previous);
        }
        let id = self.presentation.render_reaction(anchor, glyph);
        self.reactions.push((anchor, id));
        self.defer(REACTION_TTL, Deferred::Release(id));
        id
    }

    /// Floats a random heart glyph up from `anchor`.
    pub fn float_heart(&mut self, anchor: Anchor) {
        let glyph = FLOATING_HEARTS.choose(&mut self.rng).copied().unwrap_or("💖");
        self.effects.floating_heart(anchor, glyph);
    }

    fn close_input(&mut self) {
        info!("input source closed");
        self.input_closed = true;
        self.armed = None;
    }

    fn flush_deferred(&mut self) {
        for action in self.deferred.take_due(Instant::now()) {
            match action {
                Deferred::Release(id) => {
                    release(&mut self.presentation, id);
                    self.reactions.retain(|(_, r)| *r != id);
                }
                Deferred::HideCharacter => self.hide_character(),
            }
        }
    }
}
