//! Flattened runtime of a hierarchical state machine.
//!
//! - [`StateMachine`]: drives one active leaf through ticked updates
//! - [`MachineConfig`]: runtime limits
//! - [`MachineError`]: initialization and overload faults
//! - [`MachineSnapshot`]: serializable inspection view

mod config;
mod error;
pub(crate) mod graph;
mod runtime;
mod snapshot;

pub use config::{ConfigError, MachineConfig, DEFAULT_MAX_TRANSITIONS_PER_TICK};
pub use error::MachineError;
pub use graph::StateId;
pub use runtime::StateMachine;
pub use snapshot::{MachinePhase, MachineSnapshot};
