use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    observer::Effect,
    signal::{Change, Listener, Mut, Peek, Read, Signal},
};

/// Callback invoked synchronously after each change of a watch source
pub type WatchCallback = Arc<dyn Fn(Change) + Send + Sync>;

/// A default source a cell can follow: a signal container, or a zero-argument
/// accessor function whose signal reads are tracked automatically.
pub trait Watchable<T>: Send + Sync + 'static {
    /// Current value, untracked
    fn snapshot(&self) -> T;

    /// Start observing. `on_change` fires on the mutator's stack for every
    /// change until the returned guard drops.
    fn watch(&self, on_change: WatchCallback) -> WatchGuard;
}

/// Keeps a watch attached; dropping it physically detaches the listener
pub struct WatchGuard {
    _guard: Box<dyn std::any::Any + Send + Sync>,
}

impl WatchGuard {
    pub fn new(guard: impl std::any::Any + Send + Sync) -> Self { Self { _guard: Box::new(guard) } }
}

impl<T: Clone + Send + Sync + 'static> Watchable<T> for Mut<T> {
    fn snapshot(&self) -> T { self.peek() }

    fn watch(&self, on_change: WatchCallback) -> WatchGuard { WatchGuard::new(self.listen(Listener::Payload(on_change))) }
}

impl<T: Clone + Send + Sync + 'static> Watchable<T> for Read<T> {
    fn snapshot(&self) -> T { self.peek() }

    fn watch(&self, on_change: WatchCallback) -> WatchGuard { WatchGuard::new(self.listen(Listener::Payload(on_change))) }
}

/// Accessor form of a watch source. The function is run under an [`Effect`],
/// so whichever signals it reads become its dependencies, re-tracked on every
/// run. Each evaluation produces a fresh value, so changes are reported as
/// whole-value replacements.
pub struct WatchFn<T>(Arc<dyn Fn() -> T + Send + Sync>);

impl<T> Clone for WatchFn<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> WatchFn<T> {
    pub fn new(f: impl Fn() -> T + Send + Sync + 'static) -> Self { Self(Arc::new(f)) }
}

impl<T: Send + Sync + 'static> Watchable<T> for WatchFn<T> {
    fn snapshot(&self) -> T { (self.0)() }

    fn watch(&self, on_change: WatchCallback) -> WatchGuard {
        let accessor = self.0.clone();
        let primed = Arc::new(AtomicBool::new(false));
        let effect = Effect::new({
            let primed = primed.clone();
            move || {
                let _ = accessor();
                if primed.load(Ordering::Relaxed) {
                    on_change(Change::Replace);
                }
            }
        });
        // The priming run only establishes tracking; it must not notify
        effect.run();
        primed.store(true, Ordering::Relaxed);
        WatchGuard::new(effect)
    }
}
