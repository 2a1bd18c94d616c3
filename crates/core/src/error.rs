// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::session::SessionId;

/// Errors surfaced by the binding protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No live connection is currently bound to the session id.
    #[error("connection {0} is closed")]
    NotFound(SessionId),
}
