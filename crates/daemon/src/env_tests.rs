// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn listen_addr_defaults_when_unset_or_empty() {
    std::env::remove_var("TETHER_ADDR");
    assert_eq!(listen_addr(), DEFAULT_ADDR);
    std::env::set_var("TETHER_ADDR", "");
    assert_eq!(listen_addr(), DEFAULT_ADDR);
    std::env::remove_var("TETHER_ADDR");
}

#[test]
#[serial]
fn listen_addr_reads_env() {
    std::env::set_var("TETHER_ADDR", "0.0.0.0:9000");
    assert_eq!(listen_addr(), "0.0.0.0:9000");
    std::env::remove_var("TETHER_ADDR");
}

#[test]
#[serial]
fn ipc_timeout_parses_millis() {
    let cases = [
        (None, Duration::from_secs(5)),
        (Some("250"), Duration::from_millis(250)),
        (Some("fast"), Duration::from_secs(5)),
    ];
    for (value, expected) in cases {
        match value {
            Some(v) => std::env::set_var("TETHER_IPC_TIMEOUT_MS", v),
            None => std::env::remove_var("TETHER_IPC_TIMEOUT_MS"),
        }
        assert_eq!(ipc_timeout(), expected, "TETHER_IPC_TIMEOUT_MS={:?}", value);
    }
    std::env::remove_var("TETHER_IPC_TIMEOUT_MS");
}

#[test]
#[serial]
fn prune_interval_ignores_zero() {
    std::env::set_var("TETHER_PRUNE_INTERVAL_MS", "0");
    assert_eq!(prune_interval(), Duration::from_secs(60));
    std::env::remove_var("TETHER_PRUNE_INTERVAL_MS");
}

#[test]
#[serial]
fn log_filter_defaults_to_info() {
    std::env::remove_var("TETHER_LOG");
    assert_eq!(log_filter(), "info");
}
