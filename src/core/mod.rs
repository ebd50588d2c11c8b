//! Capabilities the runtime consumes from application code.
//!
//! - [`State`]: lifecycle hooks of a state behavior
//! - [`Transition`]: predicate and hooks of a transition edge
//! - [`MessageQueue`]: injectable one-shot message channel for transitions
//!
//! The machine never inspects what these objects do; it only calls their
//! hooks in the order described on each trait.

mod message;
mod state;
mod transition;

pub use message::{MessageQueue, OnMessage};
pub use state::{FnState, LogState, State};
pub use transition::{Guard, Transition};

use std::fmt::Display;
use std::hash::Hash;

/// Key type used to name states in the builder.
///
/// Names resolve transition targets at build time and label the active
/// path for diagnostics. `String` is the default; any small `Display` enum
/// works as well.
pub trait StateName: Clone + Eq + Hash + Display + 'static {}

impl<T> StateName for T where T: Clone + Eq + Hash + Display + 'static {}
