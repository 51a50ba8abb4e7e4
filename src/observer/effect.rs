use super::Observer;
use crate::{
    CurrentObserver, Signal,
    broadcast::{BroadcastId, ListenerGuard},
    signal::{Change, Listener},
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// An Effect runs a callback under its own observer context and re-runs it
/// whenever any signal the last run read sends a change.
#[derive(Clone)]
pub struct Effect(Arc<Inner>);

struct ListenerEntry {
    _guard: ListenerGuard<Change>,
    marked_for_removal: bool,
}

struct Inner {
    // The callback to re-run when any observed signal changes
    callback: Box<dyn Fn() + Send + Sync>,
    // Listeners keyed by broadcast id, for mark-and-sweep re-tracking
    entries: std::sync::RwLock<HashMap<BroadcastId, ListenerEntry>>,
}

struct WeakEffect(Weak<Inner>);

impl WeakEffect {
    fn upgrade(&self) -> Option<Effect> { self.0.upgrade().map(Effect) }
}

impl Effect {
    pub fn new<F: Fn() + Send + Sync + 'static>(callback: F) -> Self {
        Self(Arc::new(Inner { callback: Box::new(callback), entries: std::sync::RwLock::new(HashMap::new()) }))
    }

    /// Run the callback under this effect's observer context. Signals read
    /// during the run are observed; signals read by an earlier run but not
    /// this one are dropped, so conditional reads only cost while taken.
    pub fn run(&self) {
        self.mark_all_for_removal();

        CurrentObserver::set(self.clone());
        (self.0.callback)();
        CurrentObserver::remove(self);

        self.sweep_marked_listeners();
    }

    /// Drop every listener this effect holds
    pub fn clear(&self) { self.0.entries.write().expect("entries lock is poisoned").clear(); }

    fn mark_all_for_removal(&self) {
        let mut entries = self.0.entries.write().expect("entries lock is poisoned");
        for entry in entries.values_mut() {
            entry.marked_for_removal = true;
        }
    }

    fn sweep_marked_listeners(&self) {
        let mut entries = self.0.entries.write().expect("entries lock is poisoned");
        entries.retain(|_, entry| !entry.marked_for_removal);
    }
}

impl Observer for Effect {
    fn observe(&self, signal: &dyn Signal) {
        let broadcast_id = signal.broadcast_id();

        let mut entries = self.0.entries.write().expect("entries lock is poisoned");

        if let Some(entry) = entries.get_mut(&broadcast_id) {
            // already listening - just keep it through the sweep
            entry.marked_for_removal = false;
            return;
        }

        // The listener holds a weak handle, so an orphaned broadcast cannot
        // keep the effect alive
        let weak = WeakEffect(Arc::downgrade(&self.0));
        let listener: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            if let Some(effect) = weak.upgrade() {
                effect.run();
            }
        });
        entries.insert(
            broadcast_id,
            ListenerEntry { _guard: signal.listen(Listener::NotifyOnly(listener)), marked_for_removal: false },
        );
    }

    fn observer_id(&self) -> usize { Arc::as_ptr(&self.0) as *const _ as usize }
}
