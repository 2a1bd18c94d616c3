// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tether daemon library
//!
//! A TCP server that binds every connection to a session through
//! [`tether_core::SessionBinder`] and pushes queued messages to a session
//! when another client sends to its id.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod connection;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod mailbox;

pub use connection::Connection;
pub use lifecycle::{init_logging, startup, Config, Daemon, LifecycleError};
pub use listener::{Binder, ConnectionError, ListenCtx, Listener};
pub use mailbox::{Delivery, Mailbox};
