// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use tether_core::SessionId;

/// Response or push from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Session bound to this connection
    Welcome {
        session: SessionId,
        /// True when the client asked for the id this connection already had
        #[serde(default)]
        resumed: bool,
    },

    /// Message pushed to this session by another one
    Message { from: SessionId, body: String },

    /// Daemon status
    Status {
        uptime_secs: u64,
        /// Sessions currently registered for lookup
        sessions: usize,
        /// Open connections
        connections: usize,
    },

    /// Error response
    Error { message: String },
}
