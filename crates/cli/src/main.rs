// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tether: command-line client for the tether session daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tether",
    version,
    about = "Hold and message daemon sessions",
    styles = color::styles()
)]
struct Cli {
    /// Daemon address (default: $TETHER_ADDR or 127.0.0.1:7420)
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the daemon answers
    Ping,
    /// Show daemon uptime and session counts
    Status,
    /// Hold a session open and print messages pushed to it
    Listen {
        /// Resume this session id instead of using a generated one
        #[arg(long)]
        session: Option<String>,
    },
    /// Push a message to a session
    Send {
        /// Target session id
        to: String,
        /// Message body
        body: String,
        /// Sender label shown to the recipient
        #[arg(long)]
        from: Option<String>,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let client = DaemonClient::from_env(cli.addr);
    let format = cli.output;
    match cli.command {
        Commands::Ping => commands::daemon::ping(&client, format).await,
        Commands::Status => commands::daemon::status(&client, format).await,
        Commands::Listen { session } => commands::session::listen(&client, session, format).await,
        Commands::Send { to, body, from } => {
            commands::session::send(&client, to, body, from, format).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit) = e.downcast_ref::<ExitError>() {
                if !exit.message.is_empty() {
                    eprintln!("Error: {}", exit.message);
                }
                return ExitCode::from(exit.exit_code());
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
