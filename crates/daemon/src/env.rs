// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

/// Listen address used when `TETHER_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7420";

/// Listen address: TETHER_ADDR > 127.0.0.1:7420
pub fn listen_addr() -> String {
    std::env::var("TETHER_ADDR")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}

/// Per-frame read/write timeout (default 5s, `TETHER_IPC_TIMEOUT_MS`)
pub fn ipc_timeout() -> Duration {
    duration_ms("TETHER_IPC_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// How often dead registry entries are swept (default 60s, `TETHER_PRUNE_INTERVAL_MS`)
pub fn prune_interval() -> Duration {
    duration_ms("TETHER_PRUNE_INTERVAL_MS")
        .filter(|d| !d.is_zero())
        .unwrap_or(Duration::from_secs(60))
}

/// Tracing filter directive (default `info`, `TETHER_LOG`)
pub fn log_filter() -> String {
    std::env::var("TETHER_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

fn duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
