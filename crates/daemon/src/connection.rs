// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP-backed connection handle.

use std::net::SocketAddr;
use std::sync::Arc;

use tether_core::{Conn, ConnId, ContextSlot};
use tokio::sync::Notify;

/// A client connection as seen by the binder.
///
/// The per-connection task owns the socket; this handle only carries the
/// context slot and the flush signal, so holding it never keeps a socket open.
#[derive(Debug)]
pub struct Connection {
    id: ConnId,
    peer: SocketAddr,
    slot: ContextSlot,
    flush: Notify,
}

impl Connection {
    pub fn new(peer: SocketAddr) -> Arc<Self> {
        Arc::new(Self { id: ConnId::next(), peer, slot: ContextSlot::new(), flush: Notify::new() })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Resolves once a wake has been requested.
    ///
    /// Wakes issued while nobody is waiting are remembered (one permit), so
    /// repeated wakes coalesce into a single flush.
    pub async fn flush_requested(&self) {
        self.flush.notified().await
    }
}

impl Conn for Connection {
    fn conn_id(&self) -> ConnId {
        self.id
    }

    fn context_slot(&self) -> &ContextSlot {
        &self.slot
    }

    fn wake(&self) {
        self.flush.notify_one();
    }
}
