//! Builder API for hierarchical state machine construction.
//!
//! States are declared depth first: [`StateMachineBuilder::add_state`] opens
//! a state, [`StateMachineBuilder::end_state`] closes it, and everything in
//! between configures the open state or nests inside it. Transition targets
//! are named and resolved when the machine is built, so forward references
//! are fine.
//!
//! Building accumulates every problem instead of stopping at the first one;
//! see [`BuildErrors`].

mod error;
mod link;
mod machine;

pub use error::{BuildError, BuildErrors};
pub use machine::StateMachineBuilder;
