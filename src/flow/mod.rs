//! The conversation runtime.
//!
//! [`FlowController`] walks a [`Script`](crate::script::Script) through a
//! [`FlowSession`], which carries the injected ports, the input channel, the
//! deferred-mutation queue and the seeded rng.

mod autocorrect;
mod chrome;
mod controller;
mod deferred;
mod game;
mod heart;
mod session;

pub use controller::{Ending, FlowController, FlowState, Transcript};
pub use deferred::{Deferred, DeferredQueue};
pub use session::{FLOATING_HEARTS, FlowSession};
