// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tether-core: session registry and binding protocol
//!
//! Maps logical session ids to the live connections serving them so a
//! connection can be found and woken by id alone.

pub mod binding;
pub mod clock;
pub mod conn;
pub mod error;
pub mod id;
pub mod registry;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use binding::{as_session, get_context, session_id, SessionBinder};
pub use clock::{Clock, FakeClock, SystemClock};
pub use conn::{Conn, ConnId, Context, ContextSlot};
pub use error::BindError;
pub use id::{ulid_timestamp_ms, IdGen, SequentialIdGen, UlidGen};
pub use registry::ConnectionRegistry;
pub use session::{Session, SessionId};
