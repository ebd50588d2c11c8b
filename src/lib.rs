//! Hfsm: a flattened hierarchical finite state machine runtime
//!
//! States form a tree. Exactly one leaf is active at a time, and every
//! ancestor of that leaf is active with it. The tree is declared once with a
//! fluent builder and then flattened into dense arrays, so the runtime walks
//! ancestors by index instead of chasing pointers.
//!
//! # Core Concepts
//!
//! - **State**: behavior hooks (`on_enter`, `on_update`, ...) attached to a
//!   declared state
//! - **Transition**: a predicate owned by a source state, checked each tick
//!   while the source is active
//! - **Specificity**: edges of the active leaf are checked before edges of
//!   its ancestors
//! - **Settling**: after a transition fires, the new chain is checked again
//!   until nothing fires, bounded by [`MachineConfig`]
//!
//! # Example
//!
//! ```rust
//! use hfsm::{MessageQueue, StateMachine};
//!
//! let messages: MessageQueue = MessageQueue::new();
//!
//! let mut machine = StateMachine::builder()
//!     .add_state("Patrol")
//!         .add_transition("Alert", messages.on_message("noise"))
//!         .add_state("Walk")
//!             .end_state()
//!         .end_state()
//!     .add_state("Alert")
//!         .add_transition("Patrol", messages.on_message("all_clear"))
//!         .end_state()
//!     .build()
//!     .unwrap();
//!
//! machine.update().unwrap();
//! assert_eq!(machine.active_path(), "Patrol.Walk");
//!
//! messages.send("noise");
//! machine.update().unwrap();
//! assert_eq!(machine.active_path(), "Alert");
//!
//! messages.send("all_clear");
//! machine.update().unwrap();
//! assert_eq!(machine.active_path(), "Patrol.Walk");
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, BuildErrors, StateMachineBuilder};
pub use core::{FnState, Guard, LogState, MessageQueue, OnMessage, State, StateName, Transition};
pub use machine::{
    ConfigError, MachineConfig, MachineError, MachinePhase, MachineSnapshot, StateId, StateMachine,
    DEFAULT_MAX_TRANSITIONS_PER_TICK,
};
