use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Opaque identity of a broadcast, used to deduplicate subscriptions.
/// Only a live broadcast (or a guard derived from one) can produce it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BroadcastId(usize);

impl From<BroadcastId> for usize {
    fn from(id: BroadcastId) -> usize { id.0 }
}
impl std::fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A callback registered on a broadcast. Payload listeners receive the sent
/// value; notify-only listeners are pinged without it.
#[derive(Clone)]
pub enum BroadcastListener<T = ()> {
    Payload(Arc<dyn Fn(T) + Send + Sync + 'static>),
    NotifyOnly(Arc<dyn Fn() + Send + Sync + 'static>),
}

/// Conversion into a broadcast listener.
pub trait IntoBroadcastListener<T> {
    fn into_broadcast_listener(self) -> BroadcastListener<T>;
}

/// A synchronous multi-listener notification channel. Sending invokes every
/// listener on the caller's stack in no particular order, with no lock held.
#[derive(Clone)]
pub struct Broadcast<T = ()>(Arc<Inner<T>>);

struct Inner<T> {
    listeners: std::sync::RwLock<HashMap<usize, BroadcastListener<T>>>,
    next_id: AtomicUsize,
}

impl<T> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast").field("listeners", &self.0.listeners.read().unwrap().len()).finish()
    }
}

/// A listen-only reference to a broadcast.
pub struct Ref<'a, T>(&'a Broadcast<T>);

/// Keeps a listener registered. Dropping it removes the listener from the
/// broadcast, so detachment is physical rather than a skipped-over flag.
pub struct ListenerGuard<T = ()> {
    inner: Weak<Inner<T>>,
    id: usize,
}

impl<T> ListenerGuard<T> {
    /// Identity of the broadcast this guard is attached to. The guard does not
    /// keep the broadcast alive, but the allocation address stays reserved
    /// while any Arc or Weak to it exists, so the id stays unambiguous.
    pub fn broadcast_id(&self) -> BroadcastId { BroadcastId(self.inner.as_ptr() as usize) }
}

impl<T> Default for Broadcast<T>
where T: Clone
{
    fn default() -> Self { Self::new() }
}

impl<T> Broadcast<T>
where T: Clone
{
    pub fn new() -> Self { Self(Arc::new(Inner { listeners: std::sync::RwLock::new(HashMap::new()), next_id: AtomicUsize::new(0) })) }

    /// Unique identifier for this broadcast
    pub fn id(&self) -> BroadcastId { BroadcastId(Arc::as_ptr(&self.0) as usize) }

    /// Invoke all current listeners with `value`, synchronously.
    pub fn send(&self, value: T) {
        // Snapshot the listeners so none of the callbacks run under the map
        // lock. A callback may register or drop listeners on this same
        // broadcast; the snapshot keeps that reentrancy deadlock-free.
        let listeners = {
            let listeners = self.0.listeners.read().unwrap();
            listeners.values().cloned().collect::<Vec<_>>()
        };

        // The last listener takes `value` by move, the rest get clones
        if let Some((last, rest)) = listeners.split_last() {
            for listener in rest {
                match listener {
                    BroadcastListener::Payload(callback) => callback(value.clone()),
                    BroadcastListener::NotifyOnly(callback) => callback(),
                }
            }
            match last {
                BroadcastListener::Payload(callback) => callback(value),
                BroadcastListener::NotifyOnly(callback) => callback(),
            }
        }
    }

    /// Listen-only reference, for handing out subscription capability without
    /// handing out `send`.
    pub fn reference(&self) -> Ref<'_, T> { Ref(self) }
}

impl<'a, T> Ref<'a, T> {
    /// Register a listener; it stays active until the returned guard drops.
    pub fn listen<L>(&self, listener: L) -> ListenerGuard<T>
    where L: IntoBroadcastListener<T> {
        let id = self.0.0.next_id.fetch_add(1, Ordering::Relaxed);
        self.0.0.listeners.write().unwrap().insert(id, listener.into_broadcast_listener());
        ListenerGuard { inner: Arc::downgrade(&self.0.0), id }
    }

    /// Unique identifier for the underlying broadcast
    pub fn broadcast_id(&self) -> BroadcastId { BroadcastId(Arc::as_ptr(&self.0.0) as usize) }
}

impl<T> Drop for ListenerGuard<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.write().unwrap().remove(&self.id);
        }
    }
}

impl<F, T> IntoBroadcastListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_broadcast_listener(self) -> BroadcastListener<T> { BroadcastListener::Payload(Arc::new(self)) }
}

impl<T> IntoBroadcastListener<T> for BroadcastListener<T> {
    fn into_broadcast_listener(self) -> BroadcastListener<T> { self }
}

impl<T> IntoBroadcastListener<T> for Arc<dyn Fn(T) + Send + Sync + 'static> {
    fn into_broadcast_listener(self) -> BroadcastListener<T> { BroadcastListener::Payload(self) }
}

// Notify-only listeners work with a broadcast of any payload type, which is
// how observers subscribe without caring what the signal carries.
impl<T> IntoBroadcastListener<T> for Arc<dyn Fn() + Send + Sync + 'static> {
    fn into_broadcast_listener(self) -> BroadcastListener<T> { BroadcastListener::NotifyOnly(self) }
}

impl<T> IntoBroadcastListener<T> for std::sync::mpsc::Sender<T>
where T: Send + Sync + 'static
{
    fn into_broadcast_listener(self) -> BroadcastListener<T> {
        BroadcastListener::Payload(Arc::new(move |value| {
            let _ = self.send(value); // receiver may be gone
        }))
    }
}

#[cfg(feature = "tokio")]
impl<T> IntoBroadcastListener<T> for tokio::sync::mpsc::UnboundedSender<T>
where T: Send + Sync + 'static
{
    fn into_broadcast_listener(self) -> BroadcastListener<T> {
        BroadcastListener::Payload(Arc::new(move |value| {
            let _ = self.send(value); // receiver may be gone
        }))
    }
}
