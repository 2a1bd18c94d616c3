// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two connections claiming the same session id.

use std::sync::Arc;

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn last_binder_wins_and_survives_the_first_closing() {
    let binder = fake_binder();
    let first = FakeConn::new();
    let second = FakeConn::new();

    binder.reload(&first, "shared");
    binder.reload(&second, "shared");
    assert!(Arc::ptr_eq(&binder.find("shared").unwrap(), &second));

    // The first connection still believes it is "shared", but closing it must
    // not tear down the mapping the second connection now owns.
    assert!(binder.destroy(&first));
    assert!(Arc::ptr_eq(&binder.find("shared").unwrap(), &second));

    binder.wake_by_id("shared", |note| note.queued.push("x".to_string())).unwrap();
    assert_eq!(first.wake_count(), 0);
    assert_eq!(second.wake_count(), 1);
}

#[test]
fn moving_away_from_a_taken_over_id_leaves_it_alone() {
    let binder = fake_binder();
    let first = FakeConn::new();
    let second = FakeConn::new();

    binder.reload(&first, "shared");
    binder.reload(&second, "shared");
    binder.reload(&first, "elsewhere");

    assert!(Arc::ptr_eq(&binder.find("shared").unwrap(), &second));
    assert!(Arc::ptr_eq(&binder.find("elsewhere").unwrap(), &first));
}

#[test]
fn concurrent_connections_each_find_themselves() {
    let binder = Arc::new(fake_binder());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let binder = Arc::clone(&binder);
            std::thread::spawn(move || {
                let conn = FakeConn::new();
                let id = format!("worker-{}", i);
                binder.reload(&conn, id.as_str());
                let found = binder.find(&id).unwrap();
                assert!(Arc::ptr_eq(&found, &conn));
                binder.destroy(&conn);
                assert!(binder.find(&id).is_none());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(binder.registry().is_empty());
}
