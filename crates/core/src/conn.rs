// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection abstraction seen by the registry and binding protocol.
//!
//! The network layer owns its connections; this module only describes what
//! the binder needs from one: a stable identity, a context slot holding the
//! attached session, and a way to request a deferred flush.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Attachment stored in a connection's context slot.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Process-unique connection identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    /// Allocate the next identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Single-value attachment slot.
#[derive(Default)]
pub struct ContextSlot {
    inner: Mutex<Option<Context>>,
}

impl ContextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Context> {
        self.inner.lock().clone()
    }

    pub fn set(&self, context: Option<Context>) {
        *self.inner.lock() = context;
    }

    pub fn take(&self) -> Option<Context> {
        self.inner.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// Run `f` with exclusive access to the slot.
    ///
    /// `f` must not touch this slot again (the lock is not reentrant).
    pub fn update<R>(&self, f: impl FnOnce(&mut Option<Context>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl fmt::Debug for ContextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSlot").field("occupied", &!self.is_empty()).finish()
    }
}

/// An I/O-layer connection handle.
pub trait Conn: Send + Sync + 'static {
    fn conn_id(&self) -> ConnId;

    fn context_slot(&self) -> &ContextSlot;

    /// Ask the I/O loop to run this connection's flush path.
    ///
    /// Only schedules; must not block and must tolerate a closing connection.
    fn wake(&self);

    fn context(&self) -> Option<Context> {
        self.context_slot().get()
    }

    fn set_context(&self, context: Option<Context>) {
        self.context_slot().set(context)
    }
}
