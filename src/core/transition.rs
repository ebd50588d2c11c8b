//! Transition capability and closure-backed guards.
//!
//! A transition edge owns a predicate object. The runtime evaluates it on
//! every tick while the edge's source state is active, and notifies it when
//! the source state is entered or exited so it can reset any internal
//! trigger state.

/// Predicate and lifecycle hooks of a transition edge.
///
/// Only [`evaluate`](Transition::evaluate) is required.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Transition;
///
/// /// Fires once after a number of evaluations.
/// struct Countdown {
///     remaining: u32,
/// }
///
/// impl Transition for Countdown {
///     fn evaluate(&mut self) -> bool {
///         self.remaining = self.remaining.saturating_sub(1);
///         self.remaining == 0
///     }
///
///     fn on_enter(&mut self) {
///         self.remaining = 3;
///     }
/// }
///
/// let mut countdown = Countdown { remaining: 0 };
/// countdown.on_enter();
/// assert!(!countdown.evaluate());
/// assert!(!countdown.evaluate());
/// assert!(countdown.evaluate());
/// ```
pub trait Transition {
    /// Called when the source state of this edge is entered.
    fn on_enter(&mut self) {}

    /// Decide whether the edge fires on this tick.
    fn evaluate(&mut self) -> bool;

    /// Called when the source state of this edge is exited.
    fn on_exit(&mut self) {}

    /// Called once the edge has fired, between the exit and enter phases.
    fn on_transition(&mut self) {}
}

/// Any `FnMut() -> bool` closure is a transition with no-op hooks.
impl<F> Transition for F
where
    F: FnMut() -> bool,
{
    fn evaluate(&mut self) -> bool {
        self()
    }
}

type Predicate = Box<dyn FnMut() -> bool>;
type Hook = Box<dyn FnMut()>;

/// Transition built from a predicate closure and optional hooks.
///
/// # Example
///
/// ```rust
/// use hfsm::core::{Guard, Transition};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let armed = Rc::new(Cell::new(true));
/// let check = Rc::clone(&armed);
/// let disarm = Rc::clone(&armed);
///
/// let mut guard = Guard::new(move || check.get()).with_transition(move || disarm.set(false));
///
/// assert!(guard.evaluate());
/// guard.on_transition();
/// assert!(!guard.evaluate());
/// ```
pub struct Guard {
    predicate: Predicate,
    on_transition: Option<Hook>,
    on_enter: Option<Hook>,
    on_exit: Option<Hook>,
}

impl Guard {
    /// Create a guard from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            on_transition: None,
            on_enter: None,
            on_exit: None,
        }
    }

    /// Guard that fires whenever it is evaluated.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Guard that never fires. Its hooks still run.
    pub fn never() -> Self {
        Self::new(|| false)
    }

    pub fn with_transition<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.on_transition = Some(Box::new(hook));
        self
    }

    pub fn with_enter<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn with_exit<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.on_exit = Some(Box::new(hook));
        self
    }
}

impl Transition for Guard {
    fn on_enter(&mut self) {
        if let Some(hook) = self.on_enter.as_mut() {
            hook();
        }
    }

    fn evaluate(&mut self) -> bool {
        (self.predicate)()
    }

    fn on_exit(&mut self) {
        if let Some(hook) = self.on_exit.as_mut() {
            hook();
        }
    }

    fn on_transition(&mut self) {
        if let Some(hook) = self.on_transition.as_mut() {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn closure_is_a_transition() {
        let flag = Rc::new(Cell::new(false));
        let read = Rc::clone(&flag);
        let mut transition = move || read.get();

        assert!(!Transition::evaluate(&mut transition));
        flag.set(true);
        assert!(Transition::evaluate(&mut transition));
    }

    #[test]
    fn guard_evaluates_predicate() {
        let flag = Rc::new(Cell::new(false));
        let read = Rc::clone(&flag);
        let mut guard = Guard::new(move || read.get());

        assert!(!guard.evaluate());
        flag.set(true);
        assert!(guard.evaluate());
    }

    #[test]
    fn always_and_never() {
        assert!(Guard::always().evaluate());
        assert!(!Guard::never().evaluate());
    }

    #[test]
    fn guard_runs_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let enter = Rc::clone(&log);
        let exit = Rc::clone(&log);
        let fire = Rc::clone(&log);

        let mut guard = Guard::never()
            .with_enter(move || enter.borrow_mut().push("enter"))
            .with_exit(move || exit.borrow_mut().push("exit"))
            .with_transition(move || fire.borrow_mut().push("transition"));

        guard.on_enter();
        guard.on_transition();
        guard.on_exit();

        assert_eq!(*log.borrow(), vec!["enter", "transition", "exit"]);
    }

    #[test]
    fn guard_hooks_default_to_no_ops() {
        let mut guard = Guard::always();
        guard.on_enter();
        guard.on_transition();
        guard.on_exit();
        assert!(guard.evaluate());
    }
}
