//! Conversation store state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! view commands and async completions arrive as [`Event`]s, the pure
//! [`transition`] function produces the next [`StoreState`] plus the
//! [`Effect`]s for the runtime to execute.

mod composer;
mod effect;
mod event;
mod selection;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use composer::Composer;
pub use effect::Effect;
pub use event::Event;
pub use selection::resolve;
pub use state::{LoadStatus, StoreState};
pub use transition::{transition, TransitionError, TransitionResult};
