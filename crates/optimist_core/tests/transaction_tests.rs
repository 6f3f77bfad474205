//! Integration tests for transaction lifecycle and nesting.

use optimist_core::{active_transaction_id, Signal, Transaction};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::Duration;

struct App {
    value: Signal<i32>,
}

fn app() -> App {
    App {
        value: Signal::new(0),
    }
}

#[test]
fn rollback_should_work() {
    let app = app();
    app.value.set(10);

    let txn = Transaction::new();
    txn.execute(|| app.value.set(20));
    assert_eq!(app.value.get(), 20);

    txn.rollback();
    assert_eq!(app.value.get(), 10);
}

#[test]
fn commit_should_work() {
    let app = app();
    app.value.set(10);

    let txn = Transaction::new();
    txn.execute(|| app.value.set(20));
    assert_eq!(app.value.get(), 20);

    txn.commit();
    assert_eq!(app.value.get(), 20);
}

#[test]
fn transaction_is_reusable_after_settling() {
    let value = Signal::new(10);
    let txn = Transaction::new();

    txn.execute(|| value.set(20));
    assert_eq!(value.get(), 20);
    txn.rollback();
    assert_eq!(value.get(), 10);

    txn.execute(|| value.set(30));
    txn.commit();
    assert_eq!(value.get(), 30);
}

#[test]
fn mutation_runs_in_constructor() {
    let app = app();
    let txn = Transaction::with_mutation(|| app.value.set(20));
    assert_eq!(app.value.get(), 20);

    txn.rollback();
    assert_eq!(app.value.get(), 0);
}

#[test]
fn nested_transactions_roll_back_independently() {
    let app = app();
    app.value.set(10);

    let txn = Transaction::new();
    txn.execute(|| {
        app.value.set(20);

        let nested = Transaction::new();
        nested.execute(|| app.value.set(30));
        assert_eq!(app.value.get(), 30);

        nested.rollback();
        assert_eq!(app.value.get(), 20);
    });
    assert_eq!(app.value.get(), 20);

    txn.rollback();
    assert_eq!(app.value.get(), 10);
}

#[test]
fn outer_is_active_again_after_nested_execute() {
    let a = Signal::new(1);
    let b = Signal::new(1);
    let outer = Transaction::new();

    outer.execute(|| {
        let nested = Transaction::with_mutation(|| a.set(2));
        nested.commit();
        assert!(outer.is_active());
        b.set(2);
    });

    assert!(!outer.is_touched(&a));
    assert!(outer.is_touched(&b));

    outer.rollback();
    assert_eq!(a.get(), 2);
    assert_eq!(b.get(), 1);
}

#[test]
fn nested_rollback_is_not_captured_by_outer() {
    let value = Signal::new(10);
    let outer = Transaction::new();

    outer.execute(|| {
        let nested = Transaction::with_mutation(|| value.set(30));
        nested.rollback();
    });

    assert!(outer.is_empty());
    assert_eq!(value.get(), 10);
}

#[test]
fn first_touch_wins() {
    let value = Signal::new(1);
    let txn = Transaction::new();

    txn.execute(|| {
        value.set(2);
        value.set(3);
    });
    txn.execute(|| value.set(4));

    txn.rollback();
    assert_eq!(value.get(), 1);
}

#[test]
fn failing_mutation_releases_slot_and_keeps_log() {
    let value = Signal::new(1);
    let txn = Transaction::new();

    let result: Result<(), String> = txn.execute(|| {
        value.set(2);
        Err("validation failed".to_string())
    });

    assert!(result.is_err());
    assert_eq!(active_transaction_id(), None);
    assert_eq!(txn.touched_count(), 1);

    value.set(5);
    assert_eq!(txn.touched_count(), 1);

    txn.rollback();
    assert_eq!(value.get(), 1);
}

#[test]
fn panicking_mutation_releases_slot() {
    let value = Signal::new(1);
    let txn = Transaction::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        txn.execute(|| {
            value.set(2);
            panic!("mutation blew up");
        })
    }));

    assert!(outcome.is_err());
    assert_eq!(active_transaction_id(), None);

    txn.rollback();
    assert_eq!(value.get(), 1);
}

#[test]
fn commit_and_rollback_without_execute_are_noops() {
    let value = Signal::new(7);
    let txn = Transaction::new();

    txn.commit();
    assert!(txn.rollback().is_noop());
    txn.commit();

    assert_eq!(value.get(), 7);
}

#[test]
fn clones_share_the_log() {
    let value = Signal::new(1);
    let txn = Transaction::new();
    let handle = txn.clone();

    txn.execute(|| value.set(2));
    assert_eq!(handle.touched_count(), 1);

    handle.rollback();
    assert_eq!(value.get(), 1);
    assert!(txn.is_empty());
}

#[test]
fn writes_on_other_threads_are_not_captured() {
    let value = Signal::new(1);
    let txn = Transaction::new();

    txn.execute(|| {
        let remote = value.clone();
        std::thread::spawn(move || remote.set(2))
            .join()
            .expect("writer thread panicked");
    });

    assert!(txn.is_empty());
    txn.rollback();
    assert_eq!(value.get(), 2);
}

#[test]
fn observer_may_read_signal_written_mid_update() {
    let (done_tx, done_rx) = mpsc::channel();

    std::thread::spawn(move || {
        let a = Signal::new(1);
        let b = Signal::new(0);
        let _sub = b.subscribe({
            let a = a.clone();
            move |_: &i32, _| {
                let _ = a.get();
            }
        });

        let txn = Transaction::new();
        txn.execute(|| {
            a.update(|v| {
                *v += 1;
                b.set(*v);
            })
        });
        let _ = done_tx.send((a.get(), b.get(), txn.touched_count()));
    });

    let (a, b, touched) = done_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("update with a reading observer did not finish");
    assert_eq!((a, b, touched), (2, 2, 2));
}
