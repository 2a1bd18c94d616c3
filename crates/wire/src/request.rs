// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use tether_core::SessionId;

/// Request from client to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Claim a session on this connection
    Hello {
        /// Known session id to resume; omitted to keep the id assigned on connect
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session: Option<SessionId>,
    },

    /// Queue a message for another session and wake its connection
    Send {
        to: SessionId,
        body: String,
        /// Sender label; omitted to use this connection's session id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<SessionId>,
    },

    /// Get daemon status
    Status,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
