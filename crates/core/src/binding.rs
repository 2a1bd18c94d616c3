// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session binding protocol.
//!
//! Keeps two views in agreement: the registry (`id -> connection`) and each
//! connection's context slot (`connection -> session`). The network layer
//! drives it from its connection lifecycle:
//!
//! - open: [`SessionBinder::create`]
//! - data: [`SessionBinder::reload`] when a client presents a known id
//! - flush: [`SessionBinder::modify`] to drain queued output
//! - close: [`SessionBinder::destroy`]
//!
//! and any other code reaches a session by id through
//! [`SessionBinder::wake_by_id`].
//!
//! # Concurrency
//!
//! Every registry and slot operation is individually atomic, but `bind` and
//! `reload` are multi-step and are not atomic as a whole. Two binds racing
//! on one connection, or a bind racing a destroy, may leave a registry entry
//! behind until the connection is dropped (after which it reads as
//! not-found). Removals are compare-and-remove, so a connection never deletes
//! a mapping another connection has since taken over. Callers that need
//! stronger guarantees run all lifecycle calls for a connection on one task,
//! which is what the daemon does.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::conn::{Conn, Context};
use crate::error::BindError;
use crate::id::{IdGen, UlidGen};
use crate::registry::ConnectionRegistry;
use crate::session::{Session, SessionId};

/// The connection's current attachment, or `None` if there is no connection
/// or nothing attached.
pub fn get_context<C: Conn>(conn: Option<&C>) -> Option<Context> {
    conn.and_then(|c| c.context())
}

/// Checked view of a context as session type `S`.
pub fn as_session<S: Session>(context: &Context) -> Option<&S> {
    (**context).downcast_ref::<S>()
}

/// The id carried by `context`, or the empty id when there is no context or
/// the context is not an `S`.
pub fn session_id<S: Session>(context: Option<&Context>) -> SessionId {
    context.and_then(as_session::<S>).map(|s| s.id().clone()).unwrap_or_default()
}

/// Binds sessions of type `S` to connections of type `C`.
pub struct SessionBinder<C: Conn, S: Session, G: IdGen = UlidGen> {
    registry: Arc<ConnectionRegistry<C>>,
    id_gen: G,
    _session: PhantomData<fn() -> S>,
}

impl<C: Conn, S: Session, G: IdGen> SessionBinder<C, S, G> {
    pub fn new(registry: Arc<ConnectionRegistry<C>>, id_gen: G) -> Self {
        Self { registry, id_gen, _session: PhantomData }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry<C>> {
        &self.registry
    }

    /// Fresh id from the binder's generator.
    pub fn next_id(&self) -> SessionId {
        SessionId::new(self.id_gen.next())
    }

    /// Look up the connection currently serving `id`.
    pub fn find(&self, id: &str) -> Option<Arc<C>> {
        self.registry.find(id)
    }

    /// Attach `session` to `conn` and return the saved id.
    ///
    /// With no `conn`, the connection is resolved from the registry by the
    /// session's id; if that fails nothing is saved.
    pub fn save(&self, conn: Option<&Arc<C>>, session: S) -> SessionId {
        let id = session.id().clone();
        let target = match conn {
            Some(conn) => Some(Arc::clone(conn)),
            None => self.registry.find(id.as_str()),
        };
        if let Some(conn) = target {
            conn.set_context(Some(Arc::new(session)));
        }
        id
    }

    /// Attach `session` to `conn` and register its id.
    ///
    /// A stale id previously bound to `conn` is unregistered first. Returns
    /// false when the session is anonymous: the context is still saved but
    /// nothing is registered for lookup.
    pub fn bind(&self, conn: &Arc<C>, session: S) -> bool {
        let old_id = session_id::<S>(conn.context().as_ref());
        if !old_id.is_empty() && old_id != *session.id() {
            self.registry.remove_if_bound(old_id.as_str(), conn);
        }

        let id = self.save(Some(conn), session);
        if id.is_empty() {
            debug!(conn = %conn.conn_id(), "saved anonymous session");
            return false;
        }

        self.registry.store(&id, conn);
        if old_id.is_empty() {
            debug!(conn = %conn.conn_id(), session = %id, "bound session");
        } else if old_id != id {
            debug!(conn = %conn.conn_id(), from = %old_id, to = %id, "rebound session");
        }
        true
    }

    /// Read-only view of the session attached to `conn`.
    ///
    /// Returns `(None, "")` when nothing (or something other than an `S`) is
    /// attached.
    pub fn load(&self, conn: &C) -> (Option<S>, SessionId) {
        let session = conn.context().and_then(|ctx| as_session::<S>(&ctx).cloned());
        let id = session.as_ref().map(|s| s.id().clone()).unwrap_or_default();
        (session, id)
    }

    /// Atomically load, mutate and save the session attached to `conn`.
    ///
    /// Returns `None` without calling `f` when no `S` is attached. `f` runs
    /// under the connection's slot lock and must not call back into the
    /// binder for the same connection.
    pub fn modify<R>(&self, conn: &C, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        conn.context_slot().update(|slot| {
            let mut session = slot.as_ref().and_then(as_session::<S>)?.clone();
            let result = f(&mut session);
            *slot = Some(Arc::new(session));
            Some(result)
        })
    }

    /// Clear `conn`'s context and unregister its id.
    ///
    /// Returns true if a session with a non-empty id was attached. Safe to
    /// call repeatedly.
    pub fn destroy(&self, conn: &C) -> bool {
        let Some(context) = conn.context_slot().take() else {
            return false;
        };
        let id = session_id::<S>(Some(&context));
        if id.is_empty() {
            return false;
        }
        self.registry.remove_if_bound(id.as_str(), conn);
        debug!(conn = %conn.conn_id(), session = %id, "destroyed session");
        true
    }

    /// Let `fill` attach outbound data to the session bound to `id`, then
    /// wake its connection so the I/O loop flushes it.
    ///
    /// Fails with [`BindError::NotFound`] if no live connection currently
    /// carries that id. Delivery after the wake is best-effort.
    pub fn wake_by_id(&self, id: &str, fill: impl FnOnce(&mut S)) -> Result<(), BindError> {
        let not_found = || BindError::NotFound(SessionId::from(id));
        let conn = self.registry.find(id).ok_or_else(not_found)?;

        let filled = self.modify(&conn, |session| {
            if session.id() != id {
                return false;
            }
            fill(session);
            true
        });
        if filled != Some(true) {
            // The connection moved on without unregistering; drop the stale entry.
            self.registry.remove_if_bound(id, &conn);
            return Err(not_found());
        }

        trace!(conn = %conn.conn_id(), session = id, "waking connection");
        conn.wake();
        Ok(())
    }
}

impl<C: Conn, S: Session + Default, G: IdGen> SessionBinder<C, S, G> {
    /// Bind a new session with a freshly generated id to `conn`.
    pub fn create(&self, conn: &Arc<C>) -> S {
        let mut session = S::default();
        session.set_id(self.next_id());
        self.bind(conn, session.clone());
        session
    }

    /// Move `conn` onto `new_id`, returning its session and the id that was
    /// in effect before the call.
    ///
    /// A connection without a session gets an anonymous one first. Nothing
    /// changes when the ids already match, so `old_id == new_id` tells the
    /// caller the client resumed the session it already had.
    pub fn reload(&self, conn: &Arc<C>, new_id: impl Into<SessionId>) -> (S, SessionId) {
        let new_id = new_id.into();
        let (session, old_id) = self.load(conn);
        let mut session = session.unwrap_or_default();
        if old_id != new_id {
            session.set_id(new_id);
            self.bind(conn, session.clone());
        }
        (session, old_id)
    }
}

impl<C: Conn, S: Session> SessionBinder<C, S, UlidGen> {
    /// Binder with a time-ordered id generator.
    pub fn with_registry(registry: Arc<ConnectionRegistry<C>>) -> Self {
        Self::new(registry, UlidGen::new())
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
