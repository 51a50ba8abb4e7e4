use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::{
    broadcast::{BroadcastId, ListenerGuard},
    signal::{Change, Get, Listener, Mut, Peek, Read, Signal, WatchGuard, Watchable, With},
};

/// Copy strategy used when capturing the default's value into the cell
pub type CloneFn<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;

/// Options for [`Defaulted::with_options`]. All fields have defaults, so
/// struct-update syntax covers the common cases:
///
/// ```rust
/// # use defaulted_signals::*;
/// let source = Mut::new(0u32);
/// let cell = Defaulted::with_options(source, DefaultedOptions { reset_on_default_change: false, ..Default::default() });
/// ```
pub struct DefaultedOptions<T> {
    /// Copy strategy applied when capturing the default in deep mode.
    /// Defaults to `T::clone`; inject a structural copy for values whose
    /// `Clone` shares interior state (`Arc` and friends).
    pub clone: CloneFn<T>,
    /// Follow in-place (nested) changes, not just whole-value replacement,
    /// and apply the copy strategy when capturing. Default `true`. When
    /// `false`, the snapshot is taken as-is, so shared-structure values keep
    /// aliasing the default until it is next replaced.
    pub deep: bool,
    /// Keep following the default after a local edit. Default `true`. When
    /// `false`, the first genuine local edit detaches both watchers until
    /// [`Defaulted::reset`] is called.
    pub reset_on_default_change: bool,
}

impl<T: Clone + 'static> Default for DefaultedOptions<T> {
    fn default() -> Self { Self { clone: Arc::new(T::clone), deep: true, reset_on_default_change: true } }
}

/// A mutable cell seeded from an external default source. While linked, every
/// change of the source synchronously overwrites the cell; local edits never
/// write back to the source. Depending on policy a local edit either stands
/// only until the source next changes, or detaches the cell entirely until
/// [`Defaulted::reset`] re-seeds it and resumes following.
pub struct Defaulted<T> {
    state: Arc<State<T>>,
}

impl<T> Clone for Defaulted<T> {
    fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

/// The attached watcher pair. Present while the cell follows its default;
/// severing drops it, which removes both listeners from their broadcasts.
struct Link {
    _source: WatchGuard,
    _cell: ListenerGuard<Change>,
}

struct State<T> {
    cell: Mut<T>,
    source: Box<dyn Watchable<T>>,
    clone_fn: CloneFn<T>,
    deep: bool,
    reset_on_default_change: bool,
    // True only while the source observer overwrites the cell, so the cell
    // listener can tell that write apart from a genuine local edit. All
    // writes are synchronous on one stack; the atomic is only for Sync.
    internal: AtomicBool,
    link: std::sync::RwLock<Option<Link>>,
}

impl<T> State<T>
where T: Clone + Send + Sync + 'static
{
    /// Read the source's current value, through the copy strategy in deep mode
    fn capture(&self) -> T {
        let value = self.source.snapshot();
        if self.deep { (self.clone_fn)(&value) } else { value }
    }

    /// Overwrite the cell from the source under the internal flag. The cell's
    /// listeners (including our own) run before the flag clears.
    fn resync(&self) {
        self.internal.store(true, Ordering::Relaxed);
        let value = self.capture();
        self.cell.set(value);
        self.internal.store(false, Ordering::Relaxed);
    }

    fn on_default_change(&self, change: Change) {
        if !self.deep && change == Change::Mutate {
            return; // shallow mode only follows whole-value replacement
        }
        debug!("default changed, resyncing cell");
        self.resync();
    }

    fn on_local_change(&self, change: Change) {
        if self.internal.load(Ordering::Relaxed) {
            return; // our own resync write, not a local edit
        }
        if !self.deep && change == Change::Mutate {
            return; // in-place edits are invisible in shallow mode
        }
        if self.reset_on_default_change {
            return; // the edit stands until the default next changes
        }
        self.sever();
    }

    fn sever(&self) {
        let link = self.link.write().unwrap().take();
        if link.is_some() {
            debug!("local edit detached cell from its default");
        }
    }

    /// Register the watcher pair. The listeners hold the state weakly, so an
    /// orphaned source cannot keep a dropped cell alive or writing.
    fn attach(state: &Arc<Self>) {
        let source_guard = {
            let weak = Arc::downgrade(state);
            state.source.watch(Arc::new(move |change| {
                if let Some(state) = weak.upgrade() {
                    state.on_default_change(change);
                }
            }))
        };
        let cell_guard = {
            let weak = Arc::downgrade(state);
            state.cell.listen(Listener::Payload(Arc::new(move |change| {
                if let Some(state) = weak.upgrade() {
                    state.on_local_change(change);
                }
            })))
        };
        *state.link.write().unwrap() = Some(Link { _source: source_guard, _cell: cell_guard });
    }
}

impl<T> Defaulted<T>
where T: Clone + Send + Sync + 'static
{
    /// Cell seeded from `source` with default options: deep capture,
    /// following resumes on the source's next change after a local edit.
    pub fn new(source: impl Watchable<T>) -> Self { Self::with_options(source, DefaultedOptions::default()) }

    pub fn with_options(source: impl Watchable<T>, options: DefaultedOptions<T>) -> Self {
        let DefaultedOptions { clone, deep, reset_on_default_change } = options;
        let initial = {
            let value = source.snapshot();
            if deep { (clone)(&value) } else { value }
        };
        let state = Arc::new(State {
            cell: Mut::new(initial),
            source: Box::new(source),
            clone_fn: clone,
            deep,
            reset_on_default_change,
            internal: AtomicBool::new(false),
            link: std::sync::RwLock::new(None),
        });
        State::attach(&state);
        Self { state }
    }

    /// Assign a whole new value to the cell. A local edit, subject to the
    /// severing policy.
    pub fn set(&self, value: T) { self.state.cell.set(value) }

    /// Mutate the cell's value in place. A local edit in deep mode; invisible
    /// to the severing policy in shallow mode.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R { self.state.cell.update(f) }

    /// Restore the cell to the default's current value and resume following
    /// it, whether or not the link had been severed. Idempotent when nothing
    /// changed in between.
    pub fn reset(&self) {
        self.state.resync();
        let severed = self.state.link.read().unwrap().is_none();
        if severed {
            debug!("reattaching cell to its default");
            State::attach(&self.state);
        }
    }

    /// Whether the cell is currently following its default
    pub fn is_tracking(&self) -> bool { self.state.link.read().unwrap().is_some() }

    /// Readonly signal sharing the cell's storage
    pub fn read(&self) -> Read<T> { self.state.cell.read() }
}

impl<T> Signal for Defaulted<T> {
    fn listen(&self, listener: Listener) -> ListenerGuard<Change> { self.state.cell.listen(listener) }

    fn broadcast_id(&self) -> BroadcastId { self.state.cell.broadcast_id() }
}

impl<T: Send + Sync + 'static> With<T> for Defaulted<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { self.state.cell.with(f) }
}

impl<T: Clone + Send + Sync + 'static> Get<T> for Defaulted<T> {
    fn get(&self) -> T { self.state.cell.get() }
}

impl<T: Clone + Send + Sync + 'static> Peek<T> for Defaulted<T> {
    fn peek(&self) -> T { self.state.cell.peek() }
}
