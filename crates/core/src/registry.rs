// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent map from session id to the connection serving it.
//!
//! Entries hold `Weak` references: the network layer stays the only owner of
//! a connection, and an entry whose connection has been dropped reads as
//! not-found and is pruned lazily.
//!
//! Point operations are individually safe under concurrent use (the map is
//! sharded, there is no registry-wide lock). Nothing here is transactional
//! across keys.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::debug;

use crate::conn::Conn;
use crate::session::SessionId;

pub struct ConnectionRegistry<C: Conn> {
    entries: DashMap<SessionId, Weak<C>>,
}

impl<C: Conn> ConnectionRegistry<C> {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Look up the live connection for `id`.
    pub fn find(&self, id: &str) -> Option<Arc<C>> {
        if id.is_empty() {
            return None;
        }
        let weak = self.entries.get(id).map(|entry| entry.value().clone())?;
        match weak.upgrade() {
            Some(conn) => Some(conn),
            None => {
                // Only drop the entry if nobody re-stored the id meanwhile
                if self.entries.remove_if(id, |_, w| w.strong_count() == 0).is_some() {
                    debug!(session = id, "pruned entry for dropped connection");
                }
                None
            }
        }
    }

    /// Insert or overwrite the mapping for `id`. Last writer wins.
    ///
    /// Empty ids are never registered.
    pub fn store(&self, id: &SessionId, conn: &Arc<C>) {
        if id.is_empty() {
            return;
        }
        if let Some(previous) = self.entries.insert(id.clone(), Arc::downgrade(conn)) {
            if !std::ptr::eq(previous.as_ptr(), Arc::as_ptr(conn)) && previous.strong_count() > 0 {
                debug!(
                    session = %id,
                    conn = %conn.conn_id(),
                    "session taken over by another connection"
                );
            }
        }
    }

    /// Delete the mapping for `id` if present. Returns whether one existed.
    pub fn remove(&self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Delete the mapping for `id` only if it still points at `conn` (or at a
    /// connection that no longer exists).
    pub fn remove_if_bound(&self, id: &str, conn: &C) -> bool {
        self.entries
            .remove_if(id, |_, w| std::ptr::eq(w.as_ptr(), conn) || w.strong_count() == 0)
            .is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of entries, including ones whose connection was dropped but not
    /// yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of ids with a live connection, in no particular order.
    pub fn ids(&self) -> Vec<SessionId> {
        self.entries
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Drop every entry whose connection no longer exists.
    pub fn prune(&self) -> usize {
        let mut pruned = 0;
        self.entries.retain(|_, w| {
            let live = w.strong_count() > 0;
            if !live {
                pruned += 1;
            }
            live
        });
        if pruned > 0 {
            debug!(pruned, "pruned registry entries for dropped connections");
        }
        pruned
    }
}

impl<C: Conn> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
