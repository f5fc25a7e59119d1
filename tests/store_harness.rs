#![allow(unused)]
//! View state store integration harness.
//!
//! # What this covers
//!
//! - **Idempotent writes**: re-setting an identical camera or status is a
//!   no-op and notifies nobody.
//! - **Ordering**: subscribers see commits in revision order, also when
//!   writers race from several threads.
//! - **Channel delivery**: channel subscribers receive every notification and
//!   are pruned once their receiver is dropped.
//!
//! # Running
//!
//! ```sh
//! cargo test --test store_harness
//! ```

mod common;
use common::*;

use parking_lot::Mutex;
use portscope_core::store::{Notification, ViewStore};
use portscope_core::SearchStatus;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn counting(store: &ViewStore) -> Arc<Mutex<Vec<Notification>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |n: &Notification| sink.lock().push(n.clone()));
    seen
}

// ---------------------------------------------------------------------------
// Idempotent writes
// ---------------------------------------------------------------------------

#[test]
fn setting_the_same_camera_twice_notifies_once() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);
    let valencia = camera(VALENCIA.0, VALENCIA.1, 6.0);

    assert!(store.set_camera(valencia).camera);
    assert!(store.set_camera(valencia).is_empty());

    assert_eq!(store.state().camera, valencia);
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(store.revision(), 1);
}

#[test]
fn setting_the_current_camera_is_a_no_op() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);
    assert!(store.set_camera(home_camera()).is_empty());
    assert!(store.set_status(SearchStatus::Idle).is_empty());
    assert!(seen.lock().is_empty());
}

/// Results always notify, even when equal to the current ones; an identical
/// re-search still refreshes the surface.
#[test]
fn identical_results_still_notify() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);
    store.set_results(three_ports());
    store.set_results(three_ports());
    assert_eq!(seen.lock().len(), 2);
}

#[test]
fn batched_update_is_one_notification() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);

    let changes = store.update(|d| {
        d.set_results(three_ports());
        d.set_status(SearchStatus::Pending);
        d.set_camera(home_camera());
    });

    assert!(changes.results && changes.status && !changes.camera);
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].state.results.len(), 3);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn concurrent_writers_are_seen_in_revision_order() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    let zoom = (w * 100 + i) as f64 / 100.0;
                    store.set_camera(camera(0.0, 0.0, zoom + 0.001));
                }
            })
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }

    let revisions: Vec<u64> = seen.lock().iter().map(|n| n.revision).collect();
    assert_eq!(revisions, (1..=200).collect::<Vec<u64>>());
    assert_eq!(store.revision(), 200);
}

#[test]
fn notification_carries_post_commit_state() {
    let store = ViewStore::new(home_camera());
    let seen = counting(&store);
    let target = camera(OSAKA.0, OSAKA.1, 9.0);
    store.set_camera(target);
    assert_eq!(seen.lock()[0].state.camera, target);
    assert_eq!(seen.lock()[0].state, store.state());
}

// ---------------------------------------------------------------------------
// Channel delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn channel_subscribers_receive_every_commit() {
    let store = ViewStore::new(home_camera());
    let mut a = store.subscribe_channel();
    let mut b = store.subscribe_channel();

    store.set_status(SearchStatus::Pending);
    store.set_results(three_ports());

    for rx in [&mut a, &mut b] {
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.changes.status && !first.changes.results);
        assert!(second.changes.results);
        assert_eq!(second.revision, 2);
    }
}

#[test]
fn dropped_receivers_are_pruned() {
    let store = ViewStore::new(home_camera());
    let rx = store.subscribe_channel();
    let id = store.subscribe(|_| {});
    assert_eq!(store.subscriber_count(), 2);

    drop(rx);
    store.set_status(SearchStatus::Pending);
    assert_eq!(store.subscriber_count(), 1);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    assert_eq!(store.subscriber_count(), 0);
}
