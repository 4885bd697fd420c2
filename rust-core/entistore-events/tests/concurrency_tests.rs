// SPDX-License-Identifier: PMPL-1.0-or-later
//! Concurrent add/remove/emit against a shared registry

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use entistore_events::{EventEmitter, EventTarget};

#[test]
fn test_concurrent_emits_reach_every_listener() {
    const LISTENERS: usize = 100;
    const EMITTERS: usize = 50;

    let emitter = Arc::new(EventEmitter::<()>::new());
    let called = Arc::new(AtomicUsize::new(0));
    for _ in 0..LISTENERS {
        let sink = Arc::clone(&called);
        emitter.add_listener("tick", move |_: &()| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
    }

    let handles: Vec<_> = (0..EMITTERS)
        .map(|_| {
            let emitter = Arc::clone(&emitter);
            thread::spawn(move || emitter.emit("tick", &()))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    assert_eq!(called.load(Ordering::SeqCst), LISTENERS * EMITTERS);
}

#[test]
fn test_add_and_remove_while_emitting() {
    let target = Arc::new(EventTarget::<u64>::new("churn"));
    let total = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&total);
    target.add_listener(move |_: &u64| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    let churner = {
        let target = Arc::clone(&target);
        thread::spawn(move || {
            for _ in 0..200 {
                let token = target.add_listener(|_: &u64| {});
                assert!(target.remove_listener(&token));
            }
        })
    };
    let emitter = {
        let target = Arc::clone(&target);
        thread::spawn(move || {
            for i in 0..200 {
                assert!(target.emit(&i));
            }
        })
    };
    churner.join().unwrap();
    emitter.join().unwrap();

    // The permanent listener saw every emit; churned listeners are gone.
    assert_eq!(total.load(Ordering::SeqCst), 200);
    assert_eq!(target.listener_count(), 1);
}

#[tokio::test]
async fn test_listeners_can_hand_off_to_tasks() {
    const LISTENERS: usize = 100;

    let target = EventTarget::<()>::new("tick");
    let called = Arc::new(AtomicUsize::new(0));
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    for _ in 0..LISTENERS {
        let sink = Arc::clone(&called);
        let done = done_tx.clone();
        target.add_listener(move |_: &()| {
            let sink = Arc::clone(&sink);
            let done = done.clone();
            tokio::spawn(async move {
                sink.fetch_add(1, Ordering::SeqCst);
                let _ = done.send(());
            });
        });
    }
    drop(done_tx);

    assert!(target.emit(&()));
    let waited = tokio::time::timeout(Duration::from_secs(1), async {
        for _ in 0..LISTENERS {
            done_rx.recv().await;
        }
    })
    .await;

    assert!(waited.is_ok(), "asynchronous listeners did not finish in time");
    assert_eq!(called.load(Ordering::SeqCst), LISTENERS);
}

#[test]
fn test_panicking_listener_does_not_poison_registry() {
    let emitter = Arc::new(EventEmitter::<()>::new());
    emitter.add_listener("boom", |_: &()| panic!("listener failure"));

    let worker = {
        let emitter = Arc::clone(&emitter);
        thread::spawn(move || emitter.emit("boom", &()))
    };
    assert!(worker.join().is_err());

    assert!(emitter.remove_all_listeners("boom"));
    let token = emitter.add_listener("boom", |_: &()| {});
    assert!(emitter.remove_listener("boom", &token));
}
