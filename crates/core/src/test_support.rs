// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::conn::{Conn, ConnId, ContextSlot};
use crate::session::{Session, SessionId};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for session ids.
pub mod strategies {
    use crate::session::SessionId;
    use proptest::prelude::*;

    /// Non-empty, printable session ids.
    pub fn arb_session_id() -> impl Strategy<Value = SessionId> {
        "[A-Za-z0-9_-]{1,32}".prop_map(SessionId::new)
    }
}

// ── Fakes ───────────────────────────────────────────────────────────────

/// In-memory connection that records wake requests.
#[derive(Debug)]
pub struct FakeConn {
    id: ConnId,
    slot: ContextSlot,
    wakes: AtomicUsize,
}

impl FakeConn {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { id: ConnId::next(), slot: ContextSlot::new(), wakes: AtomicUsize::new(0) })
    }

    pub fn wake_count(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }
}

impl Conn for FakeConn {
    fn conn_id(&self) -> ConnId {
        self.id
    }

    fn context_slot(&self) -> &ContextSlot {
        &self.slot
    }

    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Minimal session carrying a list of queued notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    pub id: SessionId,
    pub queued: Vec<String>,
}

impl Note {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self { id: id.into(), queued: Vec::new() }
    }
}

impl Session for Note {
    fn id(&self) -> &SessionId {
        &self.id
    }

    fn set_id(&mut self, id: SessionId) {
        self.id = id;
    }
}
