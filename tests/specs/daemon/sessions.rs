// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session binding as seen over the wire.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn connection_gets_a_session_on_accept() {
    let daemon = TestDaemon::start().await;
    let mut client = daemon.connect().await;

    let id = client.hello(None).await;
    assert!(tether_core::ulid_timestamp_ms(id.as_str()).is_some(), "not a ULID: {}", id);
    assert!(daemon.ctx().binder.find(id.as_str()).is_some());
}

#[tokio::test]
async fn resume_moves_the_registry_entry() {
    let daemon = TestDaemon::start().await;
    let mut client = daemon.connect().await;
    let generated = client.hello(None).await;

    let response = client.call(Request::Hello { session: Some(SessionId::new("S2")) }).await;
    assert_eq!(response, Response::Welcome { session: SessionId::new("S2"), resumed: false });
    assert!(daemon.ctx().binder.find(generated.as_str()).is_none());
    assert!(daemon.ctx().binder.find("S2").is_some());

    let response = client.call(Request::Hello { session: Some(SessionId::new("S2")) }).await;
    assert_eq!(response, Response::Welcome { session: SessionId::new("S2"), resumed: true });
}

#[tokio::test]
async fn disconnect_unbinds_the_session() {
    let daemon = TestDaemon::start().await;
    let mut client = daemon.connect().await;
    client.hello(Some("short-lived")).await;

    drop(client);

    let binder = &daemon.ctx().binder;
    assert!(wait_for(TIMEOUT, || binder.find("short-lived").is_none()).await);
    assert!(wait_for(TIMEOUT, || binder.registry().is_empty()).await);
}

#[tokio::test]
async fn status_reports_live_sessions() {
    let daemon = TestDaemon::start().await;
    let mut a = daemon.connect().await;
    let mut b = daemon.connect().await;
    a.hello(Some("a")).await;
    b.hello(Some("b")).await;

    match a.call(Request::Status).await {
        Response::Status { sessions, connections, .. } => {
            assert_eq!(sessions, 2);
            assert_eq!(connections, 2);
        }
        other => panic!("expected Status, got {:?}", other),
    }

    drop(b);
    let ctx = daemon.ctx();
    assert!(wait_for(TIMEOUT, || ctx.binder.registry().ids().len() == 1).await);
}
