//! Resolution of named transitions into flattened edges.

use crate::builder::error::BuildError;
use crate::builder::machine::{PendingState, PendingTransition};
use crate::core::StateName;
use crate::machine::graph::{descend_to_leaf, lowest_common_ancestor, StateId, TransitionEdge};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

pub(crate) type Linked = Validation<Vec<Vec<TransitionEdge>>, NonEmptyVec<BuildError>>;

/// Resolve every pending transition, grouped per state in declaration order.
///
/// Unknown targets do not stop the pass; every one of them is reported.
pub(crate) fn link<N: StateName>(states: &[PendingState<N>], names: &HashMap<N, StateId>) -> Linked {
    let parent = |id: StateId| states[id.index()].parent;
    let default_child = |id: StateId| states[id.index()].default_child;

    let per_state = states.iter().enumerate().map(|(index, state)| {
        let source = StateId::new(index);
        let edges = state.transitions.iter().map(|transition| match transition {
            PendingTransition::Linked {
                target,
                lca,
                predicate,
            } => Validation::success(TransitionEdge {
                source,
                target: *target,
                lca: *lca,
                predicate: *predicate,
            }),
            PendingTransition::Named { target, predicate } => match names.get(target) {
                Some(&declared) => {
                    let leaf = descend_to_leaf(declared, default_child);
                    Validation::success(TransitionEdge {
                        source,
                        target: leaf,
                        lca: lowest_common_ancestor(source, leaf, parent),
                        predicate: *predicate,
                    })
                }
                None => {
                    warn!(from = %state.name, %target, "transition to undeclared state");
                    Validation::fail(BuildError::UnknownTarget {
                        from: state.name.to_string(),
                        target: target.to_string(),
                    })
                }
            },
        });
        Validation::all_vec(edges.collect::<Vec<_>>())
    });

    Validation::all_vec(per_state.collect::<Vec<_>>())
}
