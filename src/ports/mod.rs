//! Boundaries between the flow and the outside world.
//!
//! Two ports are injected into the flow: [`PresentationPort`] for anything
//! drawn and [`EffectsPort`] for confetti, hearts and haptics. Input comes in
//! as [`UserInput`] over a channel.

mod effects;
mod input;
mod presentation;
pub mod recording;

pub use effects::EffectsPort;
pub use input::{ChromeEvent, UserInput};
pub use presentation::{
    Anchor, CellFx, ChromeFeatures, ChromeFx, ElementId, InputPrompt, PresentationPort, release,
};
