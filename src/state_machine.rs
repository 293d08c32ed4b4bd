//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

pub mod effect;
pub mod event;
pub mod place_cache;
pub mod radius;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, Notice, PlaceListing, Prompt};
pub use event::{CallbackAction, Event};
pub use place_cache::ShortId;
pub use state::Session;
pub use transition::transition;
