//! Serializable inspection view of a running machine.
//!
//! This is for tooling (debug overlays, logs, test assertions). It cannot be
//! used to restore a machine: behaviors and predicates are not captured.

use super::graph::StateId;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a [`StateMachine`](crate::StateMachine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachinePhase {
    /// Built but not yet entered.
    Uninitialized,
    /// The start chain has been entered.
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub phase: MachinePhase,
    /// Current leaf, or the root start state before initialization.
    pub current: Option<StateId>,
    /// Names along the active chain, root first.
    pub active_path: Vec<String>,
    pub state_count: usize,
    pub transition_count: usize,
}

impl MachineSnapshot {
    /// Dotted form of [`active_path`](Self::active_path), e.g. `"A.AA.AAA"`.
    pub fn dotted_path(&self) -> String {
        self.active_path.join(".")
    }
}
