pub mod defaulted;
pub mod mutable;
pub mod read;
pub mod source;

pub use defaulted::*;
pub use mutable::*;
pub use read::*;
pub use source::*;

use crate::broadcast::{BroadcastId, BroadcastListener, ListenerGuard};

/// The kind of change a signal just underwent. `Replace` is a whole-value
/// assignment; `Mutate` is an in-place edit of the existing value (the
/// nested-change notification of the deep-watch model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Replace,
    Mutate,
}

/// Listener type carried by every signal's broadcast
pub type Listener = BroadcastListener<Change>;

/// Core trait for signals - provides observation capability without regard to
/// a payload value. Object safe, so observers can hold any signal.
pub trait Signal {
    /// Register a change listener on this signal's broadcast
    fn listen(&self, listener: Listener) -> ListenerGuard<Change>;

    /// Identity of this signal's broadcast, for subscription deduplication
    fn broadcast_id(&self) -> BroadcastId;
}

/// Getting the current value of a signal in a way that is tracked by the
/// current observer context
pub trait Get<T: 'static>: Signal {
    fn get(&self) -> T;
}

/// Accessing the current value of a signal with a closure, tracked by the
/// current observer context
pub trait With<T: 'static> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

/// Getting the current value of a signal without tracking it
pub trait Peek<T: 'static> {
    fn peek(&self) -> T;
}
