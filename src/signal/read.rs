use crate::{
    broadcast::{Broadcast, BroadcastId, ListenerGuard},
    context::CurrentObserver,
    signal::{Change, Get, Listener, Peek, Signal, With},
    value::ValueCell,
};

/// Read-only signal sharing storage with the `Mut` it came from
pub struct Read<T> {
    pub(crate) value: ValueCell<T>,
    pub(crate) broadcast: Broadcast<Change>,
}

impl<T> Clone for Read<T> {
    fn clone(&self) -> Self { Self { value: self.value.clone(), broadcast: self.broadcast.clone() } }
}

impl<T> Signal for Read<T> {
    fn listen(&self, listener: Listener) -> ListenerGuard<Change> { self.broadcast.reference().listen(listener) }

    fn broadcast_id(&self) -> BroadcastId { self.broadcast.id() }
}

impl<T: 'static> With<T> for Read<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        CurrentObserver::track(self);
        self.value.with(f)
    }
}

impl<T: Clone + 'static> Get<T> for Read<T> {
    fn get(&self) -> T {
        CurrentObserver::track(self);
        self.value.value()
    }
}

impl<T: Clone + 'static> Peek<T> for Read<T> {
    fn peek(&self) -> T { self.value.value() }
}

impl<T: std::fmt::Display + 'static> std::fmt::Display for Read<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.with(|v| write!(f, "{}", v)) }
}
