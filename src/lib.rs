/*!
A reactive cell that follows an external default value until you override it locally.

[`Defaulted`] seeds itself from a source (a signal container, or a
reactively-read accessor function), stays in sync while the source changes,
and lets the consumer edit the cell without ever writing back to the source.
Policy decides what a local edit means: by default the source's next change
overrides it again; with `reset_on_default_change: false` the first local
edit detaches the cell until [`Defaulted::reset`] re-seeds it.

All propagation is synchronous on the mutator's stack - there is no batching
and no microtask delay.

# Basic usage

```rust
use defaulted_signals::*;

let saved = Mut::new("dark".to_string());
let theme = Defaulted::new(saved.clone());
assert_eq!(theme.get(), "dark");

saved.set("light".to_string()); // default changed - the cell follows
assert_eq!(theme.get(), "light");

theme.set("solarized".to_string()); // local override, source untouched
assert_eq!(saved.peek(), "light");

saved.set("dark".to_string()); // the default wins again on its next change
assert_eq!(theme.get(), "dark");
```

# Keeping a local override

```rust
use defaulted_signals::*;

let saved = Mut::new(1u32);
let cell = Defaulted::with_options(
    saved.clone(),
    DefaultedOptions { reset_on_default_change: false, ..Default::default() },
);

cell.set(2); // detaches the cell from its default
saved.set(3);
assert_eq!(cell.get(), 2); // the local edit stands

cell.reset(); // back on the default, following again
assert_eq!(cell.get(), 3);
```

# Accessor sources

```rust
use defaulted_signals::*;

let base = Mut::new(10u32);
let cell = Defaulted::new(WatchFn::new({
    let base = base.clone();
    move || base.get() * 2
}));
assert_eq!(cell.get(), 20);

base.set(21);
assert_eq!(cell.get(), 42);
```
*/

mod broadcast;
mod context;
mod observer;
mod porcelain;
mod signal;
mod value;

pub use broadcast::*;
pub use context::*;
pub use observer::*;
pub use porcelain::*;
pub use signal::*;
