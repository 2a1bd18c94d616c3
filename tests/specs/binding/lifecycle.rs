// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single connection walking through open, resume, wake and close.

use std::sync::Arc;

use tether_core::{BindError, Conn};

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn open_resume_wake_close() {
    let binder = fake_binder();
    let a = FakeConn::new();

    // open
    let session = binder.create(&a);
    assert_eq!(session.id.as_str(), "S-1");
    assert!(Arc::ptr_eq(&binder.find("S-1").unwrap(), &a));

    // resume under a client-chosen id
    let (_, old) = binder.reload(&a, "S2");
    assert_eq!(old.as_str(), "S-1");
    assert!(binder.find("S-1").is_none());
    assert!(Arc::ptr_eq(&binder.find("S2").unwrap(), &a));

    // wake
    binder.wake_by_id("S2", |note| note.queued.push("ping".to_string())).unwrap();
    assert_eq!(a.wake_count(), 1);
    let (loaded, id) = binder.load(&a);
    assert_eq!(id.as_str(), "S2");
    assert_eq!(loaded.unwrap().queued, vec!["ping".to_string()]);

    // close
    assert!(binder.destroy(&a));
    assert!(binder.find("S2").is_none());
    assert!(a.context().is_none());
    assert!(!binder.destroy(&a));
}

#[test]
fn wake_after_close_names_the_session() {
    let binder = fake_binder();
    let a = FakeConn::new();
    binder.reload(&a, "gone");
    binder.destroy(&a);

    let err = binder.wake_by_id("gone", |_| {}).unwrap_err();
    assert_eq!(err, BindError::NotFound(SessionId::new("gone")));
    assert_eq!(err.to_string(), "connection gone is closed");
    assert_eq!(a.wake_count(), 0);
}

#[test]
fn dropped_connection_is_never_found() {
    let binder = fake_binder();
    let a = FakeConn::new();
    binder.create(&a);
    drop(a);

    assert!(binder.find("S-1").is_none());
    assert!(binder.registry().is_empty());
}

#[test]
fn resuming_the_current_id_changes_nothing() {
    let binder = fake_binder();
    let a = FakeConn::new();
    binder.create(&a);
    binder.wake_by_id("S-1", |note| note.queued.push("kept".to_string())).unwrap();

    let (session, old) = binder.reload(&a, "S-1");
    assert_eq!(old.as_str(), "S-1");
    assert_eq!(session.queued, vec!["kept".to_string()]);
    assert_eq!(binder.registry().ids(), vec![SessionId::new("S-1")]);
}
