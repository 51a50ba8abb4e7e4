use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use defaulted_signals::*;

mod common;
use common::change_watcher;

#[test]
fn read_subscription_sees_set_and_update() {
    common::init_tracing();
    let counter = Mut::new(0u32);

    let (watch, check) = change_watcher();
    let _sub = counter.read().subscribe(move |value: u32| watch(value));

    counter.set(1);
    counter.update(|value| *value += 1);
    assert_eq!(check(), [1, 2]);
}

#[test]
fn dropped_subscription_goes_quiet() {
    let counter = Mut::new(0u32);

    let (watch, check) = change_watcher();
    let sub = counter.read().subscribe(move |value: u32| watch(value));

    counter.set(1);
    drop(sub);
    counter.set(2);
    assert_eq!(check(), [1]);
}

#[test]
fn std_channel_as_subscriber() {
    let name = Mut::new("ada".to_string());
    let (tx, rx) = std::sync::mpsc::channel::<String>();
    let _sub = name.read().subscribe(tx);

    name.set("grace".to_string());
    assert_eq!(rx.try_recv().as_deref(), Ok("grace"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn effect_reruns_on_tracked_change() {
    let age = Mut::new(29u32);
    let runs = Arc::new(AtomicUsize::new(0));

    let effect = Effect::new({
        let (age, runs) = (age.clone(), runs.clone());
        move || {
            let _ = age.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    effect.run();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    age.set(70);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn effect_retracks_conditional_reads() {
    let gate = Mut::new(true);
    let a = Mut::new(1u32);
    let b = Mut::new(10u32);
    let runs = Arc::new(AtomicUsize::new(0));

    let effect = Effect::new({
        let (gate, a, b, runs) = (gate.clone(), a.clone(), b.clone(), runs.clone());
        move || {
            let _ = if gate.get() { a.get() } else { b.get() };
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    effect.run();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    a.set(2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    gate.set(false);
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    // the last run never read `a`, so it is no longer a dependency
    a.set(5);
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    b.set(11);
    assert_eq!(runs.load(Ordering::SeqCst), 4);
}

#[test]
fn peek_is_untracked() {
    let age = Mut::new(29u32);
    let runs = Arc::new(AtomicUsize::new(0));

    let effect = Effect::new({
        let (age, runs) = (age.clone(), runs.clone());
        move || {
            let _ = age.peek();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    effect.run();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    age.set(70);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn read_displays_current_value() {
    let age = Mut::new(29u32);
    let read = age.read();
    assert_eq!(format!("{}", read), "29");
    age.set(30);
    assert_eq!(format!("{}", read), "30");
}
