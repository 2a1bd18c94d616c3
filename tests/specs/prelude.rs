// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use similar_asserts::assert_eq;
pub use tether_core::test_support::{FakeConn, Note};
pub use tether_core::{ConnectionRegistry, SequentialIdGen, SessionBinder, SessionId};
pub use tether_wire::{Request, Response};

use tether_daemon::{startup, Config, ListenCtx};
use tokio::net::TcpStream;

pub const TIMEOUT: Duration = Duration::from_secs(2);

/// Binder over fake connections minting ids "S-1", "S-2", ...
pub type FakeBinder = SessionBinder<FakeConn, Note, SequentialIdGen>;

pub fn fake_binder() -> FakeBinder {
    SessionBinder::new(Arc::new(ConnectionRegistry::new()), SequentialIdGen::new("S"))
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// In-process daemon on an ephemeral port, stopped on drop.
pub struct TestDaemon {
    addr: SocketAddr,
    ctx: Arc<ListenCtx>,
}

impl TestDaemon {
    pub async fn start() -> Self {
        let config = Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ipc_timeout: TIMEOUT,
            prune_interval: Duration::from_millis(20),
            log_filter: "info".to_string(),
        };
        let daemon = startup(&config).await.unwrap();
        let addr = daemon.local_addr();
        let ctx = Arc::clone(daemon.context());
        tokio::spawn(daemon.run());
        Self { addr, ctx }
    }

    pub fn ctx(&self) -> &ListenCtx {
        &self.ctx
    }

    pub async fn connect(&self) -> Client {
        Client { stream: TcpStream::connect(self.addr).await.unwrap() }
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        self.ctx.shutdown.cancel();
    }
}

/// Raw wire client holding one connection open.
pub struct Client {
    stream: TcpStream,
}

impl Client {
    pub async fn call(&mut self, request: Request) -> Response {
        let (mut reader, mut writer) = self.stream.split();
        tether_wire::write_request(&mut writer, &request, TIMEOUT).await.unwrap();
        tether_wire::read_response(&mut reader, TIMEOUT).await.unwrap()
    }

    pub async fn recv(&mut self) -> Response {
        tether_wire::read_response(&mut self.stream, TIMEOUT).await.unwrap()
    }

    pub async fn hello(&mut self, session: Option<&str>) -> SessionId {
        match self.call(Request::Hello { session: session.map(SessionId::new) }).await {
            Response::Welcome { session, .. } => session,
            other => panic!("expected Welcome, got {:?}", other),
        }
    }

    pub async fn send(&mut self, to: &str, body: &str) -> Response {
        self.send_as(to, body, None).await
    }

    pub async fn send_as(&mut self, to: &str, body: &str, from: Option<&str>) -> Response {
        let from = from.map(SessionId::new);
        self.call(Request::Send { to: SessionId::new(to), body: body.to_string(), from }).await
    }
}
