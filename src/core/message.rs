//! One-shot message tokens as a transition trigger.
//!
//! A [`MessageQueue`] is a set of pending tokens. [`OnMessage`] transitions
//! fire when their expected token is pending and consume it. Entering or
//! exiting the edge's source state discards the token, so a message sent
//! while the state was inactive never fires after re-entry.
//!
//! Queues are cheap handles over shared storage: machines only see each
//! other's messages when the caller hands them the same queue.

use super::transition::Transition;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// Shared set of pending message tokens.
///
/// # Example
///
/// ```rust
/// use hfsm::core::MessageQueue;
///
/// let queue: MessageQueue = MessageQueue::new();
/// queue.send("jump");
/// assert!(queue.is_pending(&"jump".to_string()));
/// assert!(queue.consume(&"jump".to_string()));
/// assert!(!queue.consume(&"jump".to_string()));
/// ```
pub struct MessageQueue<M = String> {
    pending: Rc<RefCell<HashSet<M>>>,
}

impl<M: Eq + Hash> MessageQueue<M> {
    pub fn new() -> Self {
        Self {
            pending: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    /// Post a message. Sending a token that is already pending is a no-op.
    pub fn send(&self, message: impl Into<M>) {
        self.pending.borrow_mut().insert(message.into());
    }

    /// Remove `message` if pending, reporting whether it was.
    pub fn consume(&self, message: &M) -> bool {
        self.pending.borrow_mut().remove(message)
    }

    pub fn is_pending(&self, message: &M) -> bool {
        self.pending.borrow().contains(message)
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }

    /// Transition that fires when `message` is pending.
    pub fn on_message(&self, message: impl Into<M>) -> OnMessage<M> {
        OnMessage {
            queue: self.clone(),
            expected: message.into(),
            on_transition: None,
        }
    }
}

impl<M: Eq + Hash> Default for MessageQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for MessageQueue<M> {
    fn clone(&self) -> Self {
        Self {
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for MessageQueue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("pending", &self.pending.borrow())
            .finish()
    }
}

/// Transition that waits for one message token.
pub struct OnMessage<M = String> {
    queue: MessageQueue<M>,
    expected: M,
    on_transition: Option<Box<dyn FnMut()>>,
}

impl<M> OnMessage<M> {
    /// Run `hook` whenever this edge fires.
    pub fn with_transition<F: FnMut() + 'static>(mut self, hook: F) -> Self {
        self.on_transition = Some(Box::new(hook));
        self
    }

    pub fn expected(&self) -> &M {
        &self.expected
    }
}

impl<M: Eq + Hash> Transition for OnMessage<M> {
    fn on_enter(&mut self) {
        self.queue.consume(&self.expected);
    }

    fn evaluate(&mut self) -> bool {
        self.queue.consume(&self.expected)
    }

    fn on_exit(&mut self) {
        self.queue.consume(&self.expected);
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
    use std::cell::Cell;

    #[test]
    fn evaluate_consumes_expected_message() {
        let queue: MessageQueue = MessageQueue::new();
        let mut jump = queue.on_message("jump");

        assert!(!jump.evaluate());
        queue.send("jump");
        assert!(jump.evaluate());
        assert!(!jump.evaluate());
        assert!(queue.is_empty());
    }

    #[test]
    fn unrelated_messages_stay_pending() {
        let queue: MessageQueue = MessageQueue::new();
        let mut jump = queue.on_message("jump");

        queue.send("duck");
        assert!(!jump.evaluate());
        assert!(queue.is_pending(&"duck".to_string()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn enter_and_exit_discard_stale_messages() {
        let queue: MessageQueue = MessageQueue::new();
        let mut jump = queue.on_message("jump");

        queue.send("jump");
        jump.on_enter();
        assert!(!jump.evaluate());

        queue.send("jump");
        jump.on_exit();
        assert!(!jump.evaluate());
    }

    #[test]
    fn separate_queues_do_not_cross_trigger() {
        let first: MessageQueue = MessageQueue::new();
        let second: MessageQueue = MessageQueue::new();
        let mut jump = second.on_message("jump");

        first.send("jump");
        assert!(!jump.evaluate());
        assert!(first.is_pending(&"jump".to_string()));
    }

    #[test]
    fn cloned_queue_shares_storage() {
        let queue: MessageQueue = MessageQueue::new();
        let handle = queue.clone();
        let mut jump = queue.on_message("jump");

        handle.send("jump");
        assert!(jump.evaluate());
    }

    #[test]
    fn on_transition_hook_runs() {
        let queue: MessageQueue = MessageQueue::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut jump = queue
            .on_message("jump")
            .with_transition(move || counter.set(counter.get() + 1));

        jump.on_transition();
        assert_eq!(fired.get(), 1);
        assert_eq!(jump.expected(), "jump");
    }

    #[test]
    fn typed_tokens() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        enum Signal {
            Alarm,
            Clear,
        }

        let queue: MessageQueue<Signal> = MessageQueue::new();
        let mut alarm = queue.on_message(Signal::Alarm);

        queue.send(Signal::Clear);
        assert!(!alarm.evaluate());
        queue.send(Signal::Alarm);
        assert!(alarm.evaluate());

        queue.clear();
        assert!(queue.is_empty());
    }
}
