// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tetherd: session registry daemon.

use std::io::Write;
use std::process::ExitCode;

use tether_daemon::{init_logging, startup, Config};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tetherd: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_filter);

    let daemon = match startup(&config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            eprintln!("tetherd: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Readiness line for supervisors and tests waiting on the bound address.
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "READY {}", daemon.local_addr());
    let _ = stdout.flush();

    daemon.run_until_ctrl_c().await;
    ExitCode::SUCCESS
}
