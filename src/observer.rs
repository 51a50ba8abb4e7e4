use crate::Signal;
mod effect;
pub use effect::*;

/// An Observer is a struct that can observe multiple signals
pub trait Observer {
    /// Called when a signal is read under this observer's context
    fn observe(&self, signal: &dyn Signal);

    /// Unique identifier for this observer (for equality comparison)
    fn observer_id(&self) -> usize;
}
