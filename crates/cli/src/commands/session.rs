// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tether listen` and `tether send`

use anyhow::Result;
use tether_core::SessionId;

use super::exit_on;
use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_message, format_or_json, OutputFormat};

/// Hold a session open and print every pushed message until ctrl-c.
pub async fn listen(
    client: &DaemonClient,
    session: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut sub = client.listen(session.map(SessionId::from)).await.map_err(exit_on)?;

    let obj = serde_json::json!({ "session": sub.session(), "resumed": sub.resumed() });
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&obj)?),
        OutputFormat::Text => {
            let note = if sub.resumed() { color::context(" (resumed)") } else { String::new() };
            println!("Listening as {}{}", color::header(sub.session().as_str()), note);
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            next = sub.next_message() => {
                let (from, body) = next.map_err(exit_on)?;
                println!("{}", format_message(format, from.as_str(), &body)?);
            }
        }
    }
}

/// Push `body` to session `to`.
pub async fn send(
    client: &DaemonClient,
    to: String,
    body: String,
    from: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let to = SessionId::from(to);
    client.send_message(to.clone(), body, from.map(SessionId::from)).await.map_err(exit_on)?;
    let obj = serde_json::json!({ "status": "sent", "to": to });
    format_or_json(format, &obj, || println!("Sent to {}", color::header(to.as_str())))
}
