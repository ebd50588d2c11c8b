//! Build errors for the state machine builder.

use thiserror::Error;

/// One problem found while building a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State {name} is already in the state machine")]
    DuplicateState { name: String },

    #[error("Transition from {from} targets state {target}, which doesn't exist in the state machine")]
    UnknownTarget { from: String, target: String },

    #[error("{operation}() called while no state is open. Call .add_state(name) first")]
    NoOpenState { operation: &'static str },
}

/// Every problem found by [`StateMachineBuilder::build`](crate::StateMachineBuilder::build).
///
/// The builder does not stop at the first problem; all of them are
/// reported together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("State machine failed to build: {}", summarize(.0))]
pub struct BuildErrors(Vec<BuildError>);

fn summarize(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl BuildErrors {
    pub(crate) fn new(errors: Vec<BuildError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<BuildError> {
        self.0
    }
}
