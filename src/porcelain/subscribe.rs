use std::sync::Arc;

use crate::{
    broadcast::ListenerGuard,
    signal::{Change, Defaulted, Listener, Read, Signal},
};

/// Listener receiving an owned copy of the new value on every change
pub type SubscribeListener<T> = Box<dyn Fn(T) + Send + Sync + 'static>;

/// Conversion into a subscribe listener
pub trait IntoSubscribeListener<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T>;
}

/// Value-payload subscriptions. Listeners see every change of the signal,
/// whatever caused it; they do not fire with the current value on subscribe.
pub trait Subscribe<T: 'static> {
    fn subscribe<F>(&self, listener: F) -> SubscriptionGuard
    where F: IntoSubscribeListener<T>;
}

/// Keeps a subscription registered; dropping it unsubscribes
pub struct SubscriptionGuard {
    _listenerguard: Box<dyn std::any::Any + Send + Sync>,
}

impl SubscriptionGuard {
    pub fn new(guard: ListenerGuard<Change>) -> Self { Self { _listenerguard: Box::new(guard) } }
}

impl<F, T> IntoSubscribeListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_subscribe_listener(self) -> SubscribeListener<T> { Box::new(self) }
}

impl<T: Send + 'static> IntoSubscribeListener<T> for std::sync::mpsc::Sender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        Box::new(move |value| {
            let _ = self.send(value);
        })
    }
}

#[cfg(feature = "tokio")]
impl<T: Send + 'static> IntoSubscribeListener<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        Box::new(move |value| {
            let _ = self.send(value);
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Subscribe<T> for Read<T> {
    fn subscribe<F>(&self, listener: F) -> SubscriptionGuard
    where F: IntoSubscribeListener<T> {
        let listener = listener.into_subscribe_listener();
        let value = self.value.clone();
        SubscriptionGuard::new(self.listen(Listener::Payload(Arc::new(move |_change| listener(value.value())))))
    }
}

impl<T: Clone + Send + Sync + 'static> Subscribe<T> for Defaulted<T> {
    fn subscribe<F>(&self, listener: F) -> SubscriptionGuard
    where F: IntoSubscribeListener<T> {
        self.read().subscribe(listener)
    }
}
