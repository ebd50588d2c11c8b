//! Fluent builder for hierarchical state machines.

use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::link::link;
use crate::core::{State, StateName, Transition};
use crate::machine::graph::{Graph, StateId, StateNode};
use crate::machine::{MachineConfig, MachinePhase, StateMachine};
use std::collections::HashMap;
use stillwater::validation::Validation;
use tracing::warn;

/// Declared state, before transitions are linked.
pub(crate) struct PendingState<N> {
    pub name: N,
    pub behavior: Option<usize>,
    pub default_child: Option<StateId>,
    pub parent: Option<StateId>,
    pub transitions: Vec<PendingTransition<N>>,
}

pub(crate) enum PendingTransition<N> {
    /// Declared through the builder; the target is resolved by name at build.
    Named { target: N, predicate: usize },
    /// Spliced from an already built machine.
    Linked {
        target: StateId,
        lca: Option<StateId>,
        predicate: usize,
    },
}

/// Builder for constructing state machines with a fluent API.
///
/// The builder keeps one *open* state. `add_state` opens a child of it,
/// `end_state` closes it and returns focus to its parent, and every other
/// call applies to it. Problems are collected and reported together by
/// [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use hfsm::{MessageQueue, StateMachine};
///
/// let messages: MessageQueue = MessageQueue::new();
///
/// let mut machine = StateMachine::builder()
///     .add_state("Grounded")
///         .add_transition("Airborne", messages.on_message("jump"))
///         .add_state("Idle")
///             .end_state()
///         .add_state("Walking")
///             .set_as_start_state()
///             .end_state()
///         .end_state()
///     .add_state("Airborne")
///         .end_state()
///     .build()
///     .unwrap();
///
/// machine.update().unwrap();
/// assert_eq!(machine.active_path(), "Grounded.Walking");
///
/// messages.send("jump");
/// machine.update().unwrap();
/// assert_eq!(machine.active_path(), "Airborne");
/// ```
pub struct StateMachineBuilder<N = String> {
    states: Vec<PendingState<N>>,
    names: HashMap<N, StateId>,
    behaviors: Vec<Box<dyn State>>,
    predicates: Vec<Box<dyn Transition>>,
    open: Option<StateId>,
    start: Option<StateId>,
    config: MachineConfig,
    errors: Vec<BuildError>,
}

impl StateMachineBuilder<String> {
    /// Create a builder with `String` state names.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: StateName> StateMachineBuilder<N> {
    /// Open a new state as a child of the open state, or as a root state.
    ///
    /// The first child added to a state becomes its default child unless
    /// another child calls [`set_as_start_state`](Self::set_as_start_state).
    pub fn add_state(mut self, name: impl Into<N>) -> Self {
        let name = name.into();
        let id = StateId::new(self.states.len());

        if self.names.contains_key(&name) {
            warn!(state = %name, "state declared twice");
            self.errors.push(BuildError::DuplicateState {
                name: name.to_string(),
            });
        } else {
            self.names.insert(name.clone(), id);
        }

        if let Some(parent) = self.open {
            let parent = &mut self.states[parent.index()];
            if parent.default_child.is_none() {
                parent.default_child = Some(id);
            }
        }

        self.states.push(PendingState {
            name,
            behavior: None,
            default_child: None,
            parent: self.open,
            transitions: Vec::new(),
        });
        self.open = Some(id);
        self
    }

    /// Splice a built machine into the open state, or at root level when no
    /// state is open.
    ///
    /// The spliced states keep their own structure and transitions. Their
    /// names are not visible to transitions declared on this builder.
    /// Splicing an empty machine does nothing.
    pub fn add_sub_state_machine(mut self, machine: StateMachine<N>) -> Self {
        if machine.is_empty() {
            return self;
        }
        if machine.phase == MachinePhase::Active {
            warn!("splicing an initialized state machine, its active state is discarded");
        }

        let host = self.open;
        let state_offset = self.states.len();
        let behavior_offset = self.behaviors.len();
        let predicate_offset = self.predicates.len();

        let StateMachine {
            graph: Graph { nodes, edges },
            behaviors,
            predicates,
            start,
            ..
        } = machine;

        // Roots of the sub-machine hang off the host; its implicit root
        // scope becomes the host state.
        for node in nodes {
            let transitions = edges[node.transitions.clone()]
                .iter()
                .map(|edge| PendingTransition::Linked {
                    target: edge.target.offset(state_offset),
                    lca: edge.lca.map(|lca| lca.offset(state_offset)).or(host),
                    predicate: edge.predicate + predicate_offset,
                })
                .collect();

            self.states.push(PendingState {
                name: node.name,
                behavior: node.behavior.map(|index| index + behavior_offset),
                default_child: node.default_child.map(|child| child.offset(state_offset)),
                parent: node.parent.map(|parent| parent.offset(state_offset)).or(host),
                transitions,
            });
        }
        self.behaviors.extend(behaviors);
        self.predicates.extend(predicates);

        if let Some(start) = start.map(|start| start.offset(state_offset)) {
            match host {
                Some(host) => {
                    let host = &mut self.states[host.index()];
                    if host.default_child.is_none() {
                        host.default_child = Some(start);
                    }
                }
                None if self.start.is_none() && state_offset == 0 => self.start = Some(start),
                None => {}
            }
        }
        self
    }

    /// Attach a behavior to the open state, replacing any previous one.
    pub fn set_state(mut self, behavior: impl State + 'static) -> Self {
        let Some(id) = self.open_state("set_state") else {
            return self;
        };
        let behavior: Box<dyn State> = Box::new(behavior);
        let state = &mut self.states[id.index()];
        match state.behavior {
            Some(index) => {
                warn!(state = %state.name, "behavior replaced");
                self.behaviors[index] = behavior;
            }
            None => {
                state.behavior = Some(self.behaviors.len());
                self.behaviors.push(behavior);
            }
        }
        self
    }

    /// Add a transition from the open state to the state named `target`.
    ///
    /// Edges of one state are evaluated in the order they are added. The
    /// target may be declared later; it is resolved by [`build`](Self::build).
    pub fn add_transition(
        mut self,
        target: impl Into<N>,
        transition: impl Transition + 'static,
    ) -> Self {
        let target = target.into();
        let Some(id) = self.open_state("add_transition") else {
            return self;
        };
        let predicate = self.predicates.len();
        self.predicates.push(Box::new(transition));
        self.states[id.index()]
            .transitions
            .push(PendingTransition::Named { target, predicate });
        self
    }

    /// Close the open state; its parent becomes the open state.
    pub fn end_state(mut self) -> Self {
        if let Some(id) = self.open_state("end_state") {
            self.open = self.states[id.index()].parent;
        }
        self
    }

    /// Make the open state the default child of its parent, or the start
    /// state of the machine when it is a root state.
    pub fn set_as_start_state(mut self) -> Self {
        if let Some(id) = self.open_state("set_as_start_state") {
            match self.states[id.index()].parent {
                Some(parent) => self.states[parent.index()].default_child = Some(id),
                None => self.start = Some(id),
            }
        }
        self
    }

    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve every transition and assemble the machine.
    ///
    /// Targets are resolved to leaves by following default children, and
    /// the lowest common ancestor of each edge is computed once here. When
    /// no root state was marked as start, the first root state is used.
    pub fn build(self) -> Result<StateMachine<N>, BuildErrors> {
        let Self {
            states,
            names,
            behaviors,
            predicates,
            start,
            config,
            mut errors,
            ..
        } = self;

        let linked = match link(&states, &names) {
            Validation::Success(edges) => edges,
            Validation::Failure(failures) => {
                errors.extend(failures.iter().cloned());
                Vec::new()
            }
        };
        if !errors.is_empty() {
            return Err(BuildErrors::new(errors));
        }

        let mut nodes = Vec::with_capacity(states.len());
        let mut edges = Vec::new();
        for (state, state_edges) in states.into_iter().zip(linked) {
            let first = edges.len();
            edges.extend(state_edges);
            nodes.push(StateNode {
                name: state.name,
                behavior: state.behavior,
                default_child: state.default_child,
                parent: state.parent,
                transitions: first..edges.len(),
            });
        }

        let start = start.or_else(|| {
            nodes
                .iter()
                .position(|node| node.parent.is_none())
                .map(StateId::new)
        });

        Ok(StateMachine::new(
            Graph { nodes, edges },
            behaviors,
            predicates,
            start,
            config,
        ))
    }

    fn open_state(&mut self, operation: &'static str) -> Option<StateId> {
        if self.open.is_none() {
            warn!(operation, "builder call with no open state");
            self.errors.push(BuildError::NoOpenState { operation });
        }
        self.open
    }
}

impl<N: StateName> Default for StateMachineBuilder<N> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            names: HashMap::new(),
            behaviors: Vec::new(),
            predicates: Vec::new(),
            open: None,
            start: None,
            config: MachineConfig::default(),
            errors: Vec::new(),
        }
    }
}
