//! State machine runtime.

use crate::builder::StateMachineBuilder;
use crate::core::{State, StateName, Transition};
use crate::machine::config::MachineConfig;
use crate::machine::error::MachineError;
use crate::machine::graph::{Graph, StateId, TransitionEdge};
use crate::machine::snapshot::{MachinePhase, MachineSnapshot};
use std::fmt;
use std::mem;
use tracing::{debug, error, trace};

#[derive(Clone, Copy)]
enum Tick {
    Update,
    FixedUpdate,
}

/// Flattened hierarchical state machine.
///
/// Built once by [`StateMachineBuilder`] and then driven by calling
/// [`update`](Self::update) and/or [`fixed_update`](Self::fixed_update)
/// from an external loop. Each call first settles transitions across the
/// whole active chain, then dispatches the tick to every active behavior.
///
/// `update` and `fixed_update` each run their own transition pass. A driver
/// that calls both in one frame may see two transitions fire in that frame.
///
/// # Example
///
/// ```rust
/// use hfsm::{Guard, StateMachine};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let door_open = Rc::new(Cell::new(false));
/// let open = Rc::clone(&door_open);
///
/// let mut machine = StateMachine::builder()
///     .add_state("Closed")
///         .add_transition("Open", Guard::new(move || open.get()))
///         .end_state()
///     .add_state("Open")
///         .end_state()
///     .build()
///     .unwrap();
///
/// machine.update().unwrap();
/// assert_eq!(machine.active_path(), "Closed");
///
/// door_open.set(true);
/// machine.update().unwrap();
/// assert_eq!(machine.active_path(), "Open");
/// ```
pub struct StateMachine<N = String> {
    pub(crate) graph: Graph<N>,
    pub(crate) behaviors: Vec<Box<dyn State>>,
    pub(crate) predicates: Vec<Box<dyn Transition>>,
    pub(crate) start: Option<StateId>,
    pub(crate) current: Option<StateId>,
    pub(crate) phase: MachinePhase,
    pub(crate) config: MachineConfig,
    chain: Vec<StateId>,
}

impl StateMachine<String> {
    /// Start building a machine with `String` state names.
    pub fn builder() -> StateMachineBuilder<String> {
        StateMachineBuilder::new()
    }
}

impl<N: StateName> StateMachine<N> {
    pub(crate) fn new(
        graph: Graph<N>,
        behaviors: Vec<Box<dyn State>>,
        predicates: Vec<Box<dyn Transition>>,
        start: Option<StateId>,
        config: MachineConfig,
    ) -> Self {
        Self {
            graph,
            behaviors,
            predicates,
            start,
            current: start,
            phase: MachinePhase::Uninitialized,
            config,
            chain: Vec::new(),
        }
    }

    /// Enter the start state and its default children down to a leaf.
    ///
    /// Every behavior's `on_init` runs first. Only behavior `on_enter` hooks
    /// run along the start chain; edge enter hooks do not, so messages sent
    /// before the first tick survive initialization. Calling `init` on an
    /// active machine does nothing.
    pub fn init(&mut self) -> Result<(), MachineError> {
        if self.phase == MachinePhase::Active {
            return Ok(());
        }
        let start = self.start.ok_or(MachineError::NoStartState)?;

        for behavior in &mut self.behaviors {
            behavior.on_init();
        }

        let mut state = start;
        loop {
            self.enter_behavior(state);
            match self.graph.node(state).default_child {
                Some(child) => state = child,
                None => break,
            }
        }
        self.current = Some(state);
        self.phase = MachinePhase::Active;

        debug!(path = %self.active_path(), "state machine initialized");
        Ok(())
    }

    /// Variable-rate tick. Returns how many transitions fired.
    ///
    /// On a transition-overload fault the error is returned and no
    /// `on_update` hook runs this tick.
    pub fn update(&mut self) -> Result<usize, MachineError> {
        let fired = self.settle()?;
        self.dispatch(Tick::Update);
        Ok(fired)
    }

    /// Fixed-rate tick. Returns how many transitions fired.
    ///
    /// On a transition-overload fault the error is returned and no
    /// `on_fixed_update` hook runs this tick.
    pub fn fixed_update(&mut self) -> Result<usize, MachineError> {
        let fired = self.settle()?;
        self.dispatch(Tick::FixedUpdate);
        Ok(fired)
    }

    fn settle(&mut self) -> Result<usize, MachineError> {
        self.init()?;
        self.check_transitions()
    }

    /// Fire transitions until none is true, bounded by the configured limit.
    fn check_transitions(&mut self) -> Result<usize, MachineError> {
        let limit = self.config.max_transitions_per_tick;
        let mut fired = 0;

        while let Some(edge) = self.find_transition() {
            if fired >= limit {
                let from = self.graph.node(edge.source).name.to_string();
                let to = self.graph.node(edge.target).name.to_string();
                error!(%from, %to, limit, "transition overload, tick aborted");
                return Err(MachineError::TransitionOverload { from, to, limit });
            }
            fired += 1;
            self.execute(edge, fired);
        }
        Ok(fired)
    }

    /// First true edge, scanning from the current leaf outward and each
    /// state's edges in declaration order.
    fn find_transition(&mut self) -> Option<TransitionEdge> {
        let leaf = self.current?;
        for state in self.graph.ancestors(leaf) {
            for index in self.graph.node(state).transitions.clone() {
                let edge = self.graph.edges[index];
                if self.predicates[edge.predicate].evaluate() {
                    return Some(edge);
                }
            }
        }
        None
    }

    fn execute(&mut self, edge: TransitionEdge, fired: usize) {
        let Some(leaf) = self.current else {
            return;
        };
        // A composite targeting its own subtree: scope depends on where the
        // active leaf currently sits inside it.
        let scope = if edge.lca == Some(edge.source) {
            self.graph.lowest_common_ancestor(leaf, edge.target)
        } else {
            edge.lca
        };

        debug!(
            from = %self.graph.node(edge.source).name,
            to = %self.graph.node(edge.target).name,
            tick_transitions = fired,
            "transition fired"
        );

        let mut chain = mem::take(&mut self.chain);

        self.graph.collect_chain(leaf, scope, &mut chain);
        for &state in &chain {
            self.exit_state(state);
        }

        self.predicates[edge.predicate].on_transition();

        self.graph.collect_chain(edge.target, scope, &mut chain);
        for &state in chain.iter().rev() {
            self.enter_state(state);
        }

        self.chain = chain;
        self.current = Some(edge.target);
    }

    fn enter_behavior(&mut self, id: StateId) {
        let node = self.graph.node(id);
        trace!(state = %node.name, "enter");
        if let Some(behavior) = node.behavior {
            self.behaviors[behavior].on_enter();
        }
    }

    fn enter_state(&mut self, id: StateId) {
        self.enter_behavior(id);
        let node = self.graph.node(id);
        for index in node.transitions.clone() {
            let predicate = self.graph.edges[index].predicate;
            self.predicates[predicate].on_enter();
        }
    }

    fn exit_state(&mut self, id: StateId) {
        let node = self.graph.node(id);
        trace!(state = %node.name, "exit");
        for index in node.transitions.clone() {
            let predicate = self.graph.edges[index].predicate;
            self.predicates[predicate].on_exit();
        }
        if let Some(behavior) = node.behavior {
            self.behaviors[behavior].on_exit();
        }
    }

    /// Run the tick hook on every active behavior, root first.
    fn dispatch(&mut self, tick: Tick) {
        let Some(leaf) = self.current else {
            return;
        };
        let mut chain = mem::take(&mut self.chain);
        self.graph.collect_chain(leaf, None, &mut chain);
        for &state in chain.iter().rev() {
            if let Some(index) = self.graph.node(state).behavior {
                let behavior = &mut self.behaviors[index];
                match tick {
                    Tick::Update => behavior.on_update(),
                    Tick::FixedUpdate => behavior.on_fixed_update(),
                }
            }
        }
        self.chain = chain;
    }

    pub fn phase(&self) -> MachinePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == MachinePhase::Active
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Current leaf. Before initialization this is the root start state.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Active chain, root first.
    pub fn active_states(&self) -> Vec<StateId> {
        let mut states: Vec<StateId> = match self.current {
            Some(leaf) => self.graph.ancestors(leaf).collect(),
            None => Vec::new(),
        };
        states.reverse();
        states
    }

    /// Dotted names of the active chain, e.g. `"A.AA.AAA"`.
    pub fn active_path(&self) -> String {
        self.active_names().join(".")
    }

    fn active_names(&self) -> Vec<String> {
        self.active_states()
            .into_iter()
            .map(|id| self.graph.node(id).name.to_string())
            .collect()
    }

    /// Whether the state named `name` is anywhere in the active chain.
    pub fn is_in(&self, name: &N) -> bool {
        match self.current {
            Some(leaf) => self
                .graph
                .ancestors(leaf)
                .any(|id| self.graph.node(id).name == *name),
            None => false,
        }
    }

    /// Id of the first declared state called `name`.
    pub fn find_state(&self, name: &N) -> Option<StateId> {
        self.graph
            .nodes
            .iter()
            .position(|node| node.name == *name)
            .map(StateId::new)
    }

    pub fn state_name(&self, id: StateId) -> Option<&N> {
        self.graph.nodes.get(id.index()).map(|node| &node.name)
    }

    pub fn parent_of(&self, id: StateId) -> Option<StateId> {
        self.graph.nodes.get(id.index()).and_then(|node| node.parent)
    }

    pub fn state_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            phase: self.phase,
            current: self.current,
            active_path: self.active_names(),
            state_count: self.state_count(),
            transition_count: self.transition_count(),
        }
    }
}

impl<N: StateName> fmt::Debug for StateMachine<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("phase", &self.phase)
            .field("active_path", &self.active_path())
            .field("states", &self.state_count())
            .field("transitions", &self.transition_count())
            .field("config", &self.config)
            .finish()
    }
}
