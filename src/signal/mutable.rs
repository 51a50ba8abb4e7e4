use crate::{
    broadcast::{Broadcast, BroadcastId, ListenerGuard},
    context::CurrentObserver,
    signal::{Change, Get, Listener, Peek, Read, Signal, With},
    value::ValueCell,
};

/// Mutable (stateful) signal. Cloning shares the underlying storage and
/// broadcast. We intentionally do not implement Subscribe for this signal
/// type - hand out a `Read` for that.
pub struct Mut<T> {
    pub(crate) value: ValueCell<T>,
    pub(crate) broadcast: Broadcast<Change>,
}

impl<T> Clone for Mut<T> {
    fn clone(&self) -> Self { Self { value: self.value.clone(), broadcast: self.broadcast.clone() } }
}

impl<T> Mut<T> {
    pub fn new(value: T) -> Self { Self { value: ValueCell::new(value), broadcast: Broadcast::new() } }

    /// Assign a whole new value, notifying listeners of a replacement.
    /// The value lock is released before listeners run.
    pub fn set(&self, value: T) {
        self.value.set(value);
        self.broadcast.send(Change::Replace);
    }

    /// Mutate the current value in place, notifying listeners of a nested
    /// change. This is how edits below the top level become observable.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = self.value.with_mut(f);
        self.broadcast.send(Change::Mutate);
        result
    }

    /// Readonly signal sharing this signal's storage
    pub fn read(&self) -> Read<T> { Read { value: self.value.clone(), broadcast: self.broadcast.clone() } }
}

impl<T> Signal for Mut<T> {
    fn listen(&self, listener: Listener) -> ListenerGuard<Change> { self.broadcast.reference().listen(listener) }

    fn broadcast_id(&self) -> BroadcastId { self.broadcast.id() }
}

impl<T: 'static> With<T> for Mut<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        CurrentObserver::track(self);
        self.value.with(f)
    }
}

impl<T: Clone + 'static> Get<T> for Mut<T> {
    fn get(&self) -> T {
        CurrentObserver::track(self);
        self.value.value()
    }
}

impl<T: Clone + 'static> Peek<T> for Mut<T> {
    fn peek(&self) -> T { self.value.value() }
}
