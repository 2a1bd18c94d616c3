// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session outbox used by the daemon as its session payload.

use std::collections::VecDeque;

use tether_core::{Session, SessionId};
use tracing::warn;

/// Messages kept per session before the oldest are dropped.
pub const MAX_PENDING: usize = 1024;

/// A message waiting to be flushed to its session's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub from: SessionId,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    id: SessionId,
    outbox: VecDeque<Delivery>,
}

impl Mailbox {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self { id: id.into(), outbox: VecDeque::new() }
    }

    /// Queue a delivery, dropping the oldest one when full.
    pub fn push(&mut self, from: SessionId, body: String) {
        if self.outbox.len() >= MAX_PENDING {
            if let Some(dropped) = self.outbox.pop_front() {
                warn!(
                    session = %self.id,
                    from = %dropped.from,
                    "outbox full, dropped oldest message"
                );
            }
        }
        self.outbox.push_back(Delivery { from, body });
    }

    /// Take everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Delivery> {
        self.outbox.drain(..).collect()
    }
}

impl Session for Mailbox {
    fn id(&self) -> &SessionId {
        &self.id
    }

    fn set_id(&mut self, id: SessionId) {
        self.id = id;
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
