// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pushing messages to a session by id.

use std::sync::atomic::Ordering;

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn send_wakes_the_target_connection() {
    let daemon = TestDaemon::start().await;
    let mut listener = daemon.connect().await;
    let mut sender = daemon.connect().await;
    listener.hello(Some("S2")).await;
    sender.hello(Some("sender")).await;

    assert_eq!(sender.send("S2", "hello").await, Response::Ok);
    assert_eq!(
        listener.recv().await,
        Response::Message { from: SessionId::new("sender"), body: "hello".to_string() }
    );
}

#[tokio::test]
async fn messages_follow_a_resumed_session() {
    let daemon = TestDaemon::start().await;
    let mut listener = daemon.connect().await;
    let mut sender = daemon.connect().await;
    let first = listener.hello(None).await;
    listener.hello(Some("renamed")).await;

    let response = sender.send(first.as_str(), "lost").await;
    assert_eq!(response, Response::Error { message: format!("connection {} is closed", first) });

    assert_eq!(sender.send("renamed", "found").await, Response::Ok);
    match listener.recv().await {
        Response::Message { body, .. } => assert_eq!(body, "found"),
        other => panic!("expected Message, got {:?}", other),
    }
}

#[tokio::test]
async fn send_after_target_disconnects_fails() {
    let daemon = TestDaemon::start().await;
    let mut listener = daemon.connect().await;
    let mut sender = daemon.connect().await;
    listener.hello(Some("leaving")).await;

    drop(listener);
    let binder = &daemon.ctx().binder;
    assert!(wait_for(TIMEOUT, || binder.find("leaving").is_none()).await);

    assert_eq!(
        sender.send("leaving", "too late").await,
        Response::Error { message: "connection leaving is closed".to_string() }
    );
}

#[tokio::test]
async fn burst_of_sends_is_delivered_in_order() {
    let daemon = TestDaemon::start().await;
    let mut listener = daemon.connect().await;
    let mut sender = daemon.connect().await;
    listener.hello(Some("inbox")).await;

    let bodies: Vec<String> = (0..20).map(|i| format!("m{}", i)).collect();
    for body in &bodies {
        assert_eq!(sender.send("inbox", body).await, Response::Ok);
    }

    let mut received = Vec::new();
    while received.len() < bodies.len() {
        match listener.recv().await {
            Response::Message { body, .. } => received.push(body),
            other => panic!("expected Message, got {:?}", other),
        }
    }
    assert_eq!(received, bodies);
}

#[tokio::test]
async fn labelled_send_does_not_steal_the_label() {
    let daemon = TestDaemon::start().await;
    let mut alice = daemon.connect().await;
    let mut bob = daemon.connect().await;
    alice.hello(Some("alice")).await;
    bob.hello(Some("bob")).await;

    let mut sender = daemon.connect().await;
    assert_eq!(sender.send_as("bob", "hi", Some("alice")).await, Response::Ok);
    assert_eq!(
        bob.recv().await,
        Response::Message { from: SessionId::new("alice"), body: "hi".to_string() }
    );
    drop(sender);
    let ctx = daemon.ctx();
    assert!(wait_for(TIMEOUT, || ctx.connections.load(Ordering::Relaxed) == 2).await);

    assert_eq!(bob.send("alice", "reply").await, Response::Ok);
    assert_eq!(
        alice.recv().await,
        Response::Message { from: SessionId::new("bob"), body: "reply".to_string() }
    );
}
