//! The scripted "autocorrect" of a reluctant answer.

use super::session::FlowSession;
use crate::ports::{EffectsPort, PresentationPort};
use crate::script::ScriptMessage;
use std::time::Duration;
use tracing::{debug, instrument};

const KEYSTROKE: Duration = Duration::from_millis(100);
const BEFORE_CORRECTION: Duration = Duration::from_millis(600);
const HIGHLIGHT: Duration = Duration::from_millis(300);
const SHOW_TARGET: Duration = Duration::from_millis(500);

impl<P, E> FlowSession<P, E>
where
    P: PresentationPort,
    E: EffectsPort,
{
    /// Types `typed` into the input affordance, corrects it to `target`,
    /// then sends `target`.
    ///
    /// Without an input affordance only the typing animation is skipped.
    #[instrument(skip(self, reaction))]
    pub async fn autocorrect(
        &mut self,
        typed: &'static str,
        target: &'static str,
        reaction: Option<&ScriptMessage>,
        settle: Duration,
    ) {
        if self.listeners.input_field {
            let mut draft = String::with_capacity(typed.len());
            for ch in typed.chars() {
                draft.push(ch);
                self.presentation.render_input_draft(Some(&draft), false);
                self.suspend(KEYSTROKE).await;
            }
            self.suspend(BEFORE_CORRECTION).await;

            self.presentation.render_input_draft(Some(&draft), true);
            self.suspend(HIGHLIGHT).await;

            self.presentation.render_input_draft(Some(target), true);
            self.suspend(SHOW_TARGET).await;

            self.presentation.render_input_draft(None, false);
        } else {
            debug!("no input field, skipping the typing animation");
        }

        self.deliver_message(&ScriptMessage::sent(target)).await;
        self.presentation
            .render_notification(&format!("Autocorrected to \"{target}\""));
        if let Some(reaction) = reaction {
            self.deliver_message(reaction).await;
        }
        self.suspend(settle).await;
    }
}
