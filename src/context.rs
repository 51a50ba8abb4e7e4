use crate::{Observer, Signal};
use std::{cell::RefCell, sync::Arc};

// Thread-local stack of observer contexts, so effects can nest
thread_local! {
    static OBSERVER_STACK: RefCell<Vec<Arc<dyn Observer>>> = const { RefCell::new(Vec::new()) };
}

/// Manages the current observer stack and lets signals subscribe whichever
/// observer is on top of it at read time.
pub struct CurrentObserver {}

impl CurrentObserver {
    /// Subscribes the current observer (if any) to a signal
    pub fn track<S>(signal: &S)
    where S: Signal {
        OBSERVER_STACK.with(|stack| {
            if let Some(observer) = stack.borrow().last() {
                observer.observe(signal);
            }
        });
    }

    /// Pushes an observer onto the stack, making it the current context
    pub fn set<O: Observer + 'static>(observer: O) {
        OBSERVER_STACK.with(|stack| {
            stack.borrow_mut().push(Arc::new(observer));
        });
    }

    /// Pops the current observer, restoring the previous one
    pub fn pop() {
        OBSERVER_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }

    /// Removes a specific observer from the stack
    pub fn remove(observer: &dyn Observer) {
        let target_id = observer.observer_id();
        OBSERVER_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(last) = stack.last() {
                if last.observer_id() == target_id {
                    stack.pop();
                    return;
                }
            }
            // not on top - search and remove
            stack.retain(|o| o.observer_id() != target_id);
        });
    }

    /// The observer currently on top of the stack, if any
    pub fn current() -> Option<Arc<dyn Observer>> { OBSERVER_STACK.with(|stack| stack.borrow().last().cloned()) }
}
