// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tether ping` and `tether status`

use anyhow::Result;

use super::exit_on;
use crate::client::DaemonClient;
use crate::output::{format_or_json, format_uptime, OutputFormat};

pub async fn ping(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    client.ping().await.map_err(exit_on)?;
    let obj = serde_json::json!({ "status": "ok", "addr": client.addr() });
    format_or_json(format, &obj, || println!("pong from {}", client.addr()))
}

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await.map_err(exit_on)?;
    let obj = serde_json::json!({
        "status": "running",
        "addr": client.addr(),
        "uptime_secs": status.uptime_secs,
        "uptime": format_uptime(status.uptime_secs),
        "sessions": status.sessions,
        "connections": status.connections,
    });
    format_or_json(format, &obj, || {
        println!("Status: running");
        println!("Address: {}", client.addr());
        println!("Uptime: {}", format_uptime(status.uptime_secs));
        println!("Sessions: {} bound", status.sessions);
        println!("Connections: {} open", status.connections);
    })
}
