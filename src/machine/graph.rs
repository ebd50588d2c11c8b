//! Flattened state tree.
//!
//! States and transition edges live in two dense arrays addressed by
//! [`StateId`] and edge index. Tree structure is expressed with parent and
//! default-child indices only, so ancestor walks are array hops.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Dense index of a declared state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        StateId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Shift by `offset`, used when splicing one graph into another.
    pub(crate) fn offset(self, offset: usize) -> Self {
        StateId(self.0 + offset)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One declared state.
#[derive(Clone, Debug)]
pub(crate) struct StateNode<N> {
    pub name: N,
    pub behavior: Option<usize>,
    pub default_child: Option<StateId>,
    pub parent: Option<StateId>,
    pub transitions: Range<usize>,
}

/// One declared transition, owned by `source`.
///
/// `target` is always a leaf. `lca` is `None` when source and target sit in
/// different root trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TransitionEdge {
    pub source: StateId,
    pub target: StateId,
    pub lca: Option<StateId>,
    pub predicate: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Graph<N> {
    pub nodes: Vec<StateNode<N>>,
    pub edges: Vec<TransitionEdge>,
}

impl<N> Graph<N> {
    pub fn node(&self, id: StateId) -> &StateNode<N> {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.node(id).parent
    }

    /// `id` followed by each of its ancestors, innermost first.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_, N> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Fill `chain` with `from` and its ancestors, stopping before `stop`.
    pub fn collect_chain(&self, from: StateId, stop: Option<StateId>, chain: &mut Vec<StateId>) {
        chain.clear();
        chain.extend(self.ancestors(from).take_while(|&id| Some(id) != stop));
    }

    pub fn lowest_common_ancestor(&self, a: StateId, b: StateId) -> Option<StateId> {
        lowest_common_ancestor(a, b, |id| self.parent(id))
    }
}

pub(crate) struct Ancestors<'a, N> {
    graph: &'a Graph<N>,
    next: Option<StateId>,
}

impl<N> Iterator for Ancestors<'_, N> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

/// Deepest state that is `a` or one of its ancestors and also `b` or one
/// of its ancestors.
///
/// Trees are shallow, so every ancestor of `a` is compared against every
/// ancestor of `b` without building any lookup structure. `None` means the
/// two states sit in different root trees.
pub(crate) fn lowest_common_ancestor<P>(a: StateId, b: StateId, parent: P) -> Option<StateId>
where
    P: Fn(StateId) -> Option<StateId>,
{
    let mut left = Some(a);
    while let Some(candidate) = left {
        let mut right = Some(b);
        while let Some(other) = right {
            if candidate == other {
                return Some(candidate);
            }
            right = parent(other);
        }
        left = parent(candidate);
    }
    None
}

/// Follow default children from `id` down to a leaf.
pub(crate) fn descend_to_leaf<D>(id: StateId, default_child: D) -> StateId
where
    D: Fn(StateId) -> Option<StateId>,
{
    let mut leaf = id;
    while let Some(child) = default_child(leaf) {
        leaf = child;
    }
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;

    //        0          4
    //      /   \        |
    //     1     2       5
    //     |
    //     3
    fn forest() -> Graph<&'static str> {
        let node = |name, parent: Option<usize>, default_child: Option<usize>| StateNode {
            name,
            behavior: None,
            default_child: default_child.map(StateId::new),
            parent: parent.map(StateId::new),
            transitions: 0..0,
        };
        Graph {
            nodes: vec![
                node("A", None, Some(1)),
                node("AA", Some(0), Some(3)),
                node("AB", Some(0), None),
                node("AAA", Some(1), None),
                node("B", None, Some(5)),
                node("BA", Some(4), None),
            ],
            edges: Vec::new(),
        }
    }

    fn id(index: usize) -> StateId {
        StateId::new(index)
    }

    #[test]
    fn ancestors_walk_to_root() {
        let graph = forest();
        let chain: Vec<_> = graph.ancestors(id(3)).collect();
        assert_eq!(chain, vec![id(3), id(1), id(0)]);
    }

    #[test]
    fn collect_chain_stops_before_scope() {
        let graph = forest();
        let mut chain = vec![id(5)];
        graph.collect_chain(id(3), Some(id(0)), &mut chain);
        assert_eq!(chain, vec![id(3), id(1)]);
        graph.collect_chain(id(3), None, &mut chain);
        assert_eq!(chain, vec![id(3), id(1), id(0)]);
        graph.collect_chain(id(3), Some(id(3)), &mut chain);
        assert!(chain.is_empty());
    }

    #[test]
    fn lca_of_siblings_is_parent() {
        let graph = forest();
        assert_eq!(graph.lowest_common_ancestor(id(1), id(2)), Some(id(0)));
        assert_eq!(graph.lowest_common_ancestor(id(3), id(2)), Some(id(0)));
    }

    #[test]
    fn lca_with_ancestor_is_ancestor() {
        let graph = forest();
        assert_eq!(graph.lowest_common_ancestor(id(3), id(0)), Some(id(0)));
        assert_eq!(graph.lowest_common_ancestor(id(1), id(3)), Some(id(1)));
    }

    #[test]
    fn lca_of_self_is_self() {
        let graph = forest();
        assert_eq!(graph.lowest_common_ancestor(id(3), id(3)), Some(id(3)));
    }

    #[test]
    fn lca_across_root_trees_is_none() {
        let graph = forest();
        assert_eq!(graph.lowest_common_ancestor(id(3), id(5)), None);
        assert_eq!(graph.lowest_common_ancestor(id(0), id(4)), None);
    }

    #[test]
    fn descend_follows_default_children() {
        let graph = forest();
        let leaf = descend_to_leaf(id(0), |s| graph.node(s).default_child);
        assert_eq!(leaf, id(3));
        assert_eq!(descend_to_leaf(id(2), |s| graph.node(s).default_child), id(2));
    }

    #[test]
    fn state_id_offsets() {
        assert_eq!(id(2).offset(5), id(7));
        assert_eq!(id(7).index(), 7);
        assert_eq!(id(7).to_string(), "#7");
    }
}
