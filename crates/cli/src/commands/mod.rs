// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod daemon;
pub mod session;

use crate::client::ClientError;
use crate::exit_error::{ExitError, EXIT_NOT_RUNNING, EXIT_REJECTED};

/// Map a client failure onto the process exit code it should produce.
pub(crate) fn exit_on(e: ClientError) -> anyhow::Error {
    if e.is_not_running() {
        return ExitError::new(EXIT_NOT_RUNNING, e.to_string()).into();
    }
    match e {
        ClientError::Rejected(message) => ExitError::new(EXIT_REJECTED, message).into(),
        other => other.into(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
