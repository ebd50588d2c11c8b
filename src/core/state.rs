//! Behavior capability attached to declared states.
//!
//! A state in the machine is only a node in the flattened tree. What it
//! *does* while active is supplied by a `State` implementation, attached
//! through [`StateMachineBuilder::set_state`](crate::builder::StateMachineBuilder::set_state).
//! States without a behavior are purely organizational composites.

/// Lifecycle hooks of a state behavior.
///
/// Every hook defaults to a no-op, so implementations only override what
/// they need.
///
/// # Hook order
///
/// - `on_init` runs once for every behavior when the machine initializes,
///   before any state is entered.
/// - `on_enter` runs when the state joins the active chain.
/// - `on_update` / `on_fixed_update` run on every tick while the state is
///   in the active chain, after transitions have settled.
/// - `on_exit` runs when the state leaves the active chain.
///
/// # Example
///
/// ```rust
/// use hfsm::core::State;
///
/// struct Patrol {
///     steps: u32,
/// }
///
/// impl State for Patrol {
///     fn on_enter(&mut self) {
///         self.steps = 0;
///     }
///
///     fn on_update(&mut self) {
///         self.steps += 1;
///     }
/// }
///
/// let mut patrol = Patrol { steps: 7 };
/// patrol.on_enter();
/// patrol.on_update();
/// assert_eq!(patrol.steps, 1);
/// ```
pub trait State {
    /// Called once when the machine is initialized.
    fn on_init(&mut self) {}

    /// Called when the machine enters the state.
    fn on_enter(&mut self) {}

    /// Called on each variable-rate tick while the state is active.
    fn on_update(&mut self) {}

    /// Called on each fixed-rate tick while the state is active.
    fn on_fixed_update(&mut self) {}

    /// Called when the machine exits the state.
    fn on_exit(&mut self) {}
}

type Hook = Box<dyn FnMut()>;

/// Behavior assembled from optional closures.
///
/// Missing hooks are no-ops.
///
/// # Example
///
/// ```rust
/// use hfsm::core::{FnState, State};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let entered = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&entered);
///
/// let mut state = FnState::new().with_enter(move || counter.set(counter.get() + 1));
/// state.on_enter();
/// state.on_enter();
/// assert_eq!(entered.get(), 2);
/// ```
#[derive(Default)]
pub struct FnState {
    init: Option<Hook>,
    enter: Option<Hook>,
    update: Option<Hook>,
    fixed_update: Option<Hook>,
    exit: Option<Hook>,
}

impl FnState {
    /// Create a behavior with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Behavior that only reacts to variable-rate updates.
    pub fn updating<F>(update: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self::new().with_update(update)
    }

    /// Behavior that only reacts to entering and exiting.
    pub fn entering_exiting<E, X>(enter: E, exit: X) -> Self
    where
        E: FnMut() + 'static,
        X: FnMut() + 'static,
    {
        Self::new().with_enter(enter).with_exit(exit)
    }

    pub fn with_init<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.init = Some(Box::new(hook));
        self
    }

    pub fn with_enter<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.enter = Some(Box::new(hook));
        self
    }

    pub fn with_update<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.update = Some(Box::new(hook));
        self
    }

    pub fn with_fixed_update<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.fixed_update = Some(Box::new(hook));
        self
    }

    pub fn with_exit<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.exit = Some(Box::new(hook));
        self
    }
}

fn run(hook: &mut Option<Hook>) {
    if let Some(hook) = hook.as_mut() {
        hook();
    }
}

impl State for FnState {
    fn on_init(&mut self) {
        run(&mut self.init);
    }

    fn on_enter(&mut self) {
        run(&mut self.enter);
    }

    fn on_update(&mut self) {
        run(&mut self.update);
    }

    fn on_fixed_update(&mut self) {
        run(&mut self.fixed_update);
    }

    fn on_exit(&mut self) {
        run(&mut self.exit);
    }
}

/// Behavior that reports entering and exiting through `tracing`.
///
/// Useful as a placeholder while wiring up a machine.
#[derive(Clone, Debug, Default)]
pub struct LogState {
    on_enter: Option<String>,
    on_exit: Option<String>,
}

impl LogState {
    pub fn new(on_enter: Option<String>, on_exit: Option<String>) -> Self {
        Self { on_enter, on_exit }
    }

    /// Log `label` on both enter and exit.
    pub fn labeled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            on_enter: Some(format!("entered {label}")),
            on_exit: Some(format!("exited {label}")),
        }
    }
}

impl State for LogState {
    fn on_enter(&mut self) {
        if let Some(message) = &self.on_enter {
            tracing::info!(target: "hfsm::state", "{message}");
        }
    }

    fn on_exit(&mut self) {
        if let Some(message) = &self.on_exit {
            tracing::info!(target: "hfsm::state", "{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, event: &'static str) -> impl FnMut() {
        let log = Rc::clone(log);
        move || log.borrow_mut().push(event)
    }

    #[test]
    fn default_hooks_are_no_ops() {
        struct Inert;
        impl State for Inert {}

        let mut state = Inert;
        state.on_init();
        state.on_enter();
        state.on_update();
        state.on_fixed_update();
        state.on_exit();
    }

    #[test]
    fn fn_state_dispatches_each_hook() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut state = FnState::new()
            .with_init(recorder(&log, "init"))
            .with_enter(recorder(&log, "enter"))
            .with_update(recorder(&log, "update"))
            .with_fixed_update(recorder(&log, "fixed"))
            .with_exit(recorder(&log, "exit"));

        state.on_init();
        state.on_enter();
        state.on_update();
        state.on_fixed_update();
        state.on_exit();

        assert_eq!(*log.borrow(), vec!["init", "enter", "update", "fixed", "exit"]);
    }

    #[test]
    fn fn_state_skips_missing_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut state = FnState::updating(recorder(&log, "update"));

        state.on_enter();
        state.on_update();
        state.on_exit();

        assert_eq!(*log.borrow(), vec!["update"]);
    }

    #[test]
    fn entering_exiting_only_wires_two_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut state =
            FnState::entering_exiting(recorder(&log, "enter"), recorder(&log, "exit"));

        state.on_update();
        state.on_fixed_update();
        state.on_enter();
        state.on_exit();

        assert_eq!(*log.borrow(), vec!["enter", "exit"]);
    }

    #[test]
    fn log_state_formats_labels() {
        let state = LogState::labeled("Idle");
        assert_eq!(state.on_enter.as_deref(), Some("entered Idle"));
        assert_eq!(state.on_exit.as_deref(), Some("exited Idle"));
    }
}
