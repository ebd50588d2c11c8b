//! Runtime faults.

use thiserror::Error;

/// Errors raised while initializing or ticking a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("No state set as start state")]
    NoStartState,

    /// Too many transitions fired within one tick. The offending transition
    /// was not executed.
    #[error(
        "Too many transitions in one update (limit {limit}). Transition check stopped at [{from} => {to}]"
    )]
    TransitionOverload {
        from: String,
        to: String,
        limit: usize,
    },
}

impl MachineError {
    /// Whether this is the transition-overload fault.
    pub fn is_overload(&self) -> bool {
        matches!(self, MachineError::TransitionOverload { .. })
    }
}
