// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn drain_returns_in_order_and_empties() {
    let mut mb = Mailbox::new("S1");
    mb.push(SessionId::new("a"), "one".to_string());
    mb.push(SessionId::new("b"), "two".to_string());

    let drained = mb.drain();
    assert_eq!(drained.iter().map(|d| d.body.as_str()).collect::<Vec<_>>(), ["one", "two"]);
    assert_eq!(drained[1].from, "b");
    assert!(mb.drain().is_empty());
}

#[test]
fn push_drops_oldest_when_full() {
    let mut mb = Mailbox::new("S1");
    for i in 0..=MAX_PENDING {
        mb.push(SessionId::new("x"), i.to_string());
    }
    let drained = mb.drain();
    assert_eq!(drained.len(), MAX_PENDING);
    assert_eq!(drained[0].body, "1");
}

#[test]
fn set_id_keeps_outbox() {
    let mut mb = Mailbox::default();
    mb.push(SessionId::new("x"), "kept".to_string());
    mb.set_id(SessionId::new("S2"));
    assert_eq!(mb.id(), &SessionId::new("S2"));
    assert_eq!(mb.drain().len(), 1);
}
