// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tether_core::ConnectionRegistry;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::env;
use crate::listener::{Binder, ListenCtx, Listener};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the listener binds to
    pub addr: SocketAddr,
    /// Per-frame read/write timeout
    pub ipc_timeout: Duration,
    /// Registry sweep interval
    pub prune_interval: Duration,
    /// Tracing filter directive
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let raw = env::listen_addr();
        let addr = raw.parse().map_err(|_| LifecycleError::InvalidAddr(raw))?;
        Ok(Self {
            addr,
            ipc_timeout: env::ipc_timeout(),
            prune_interval: env::prune_interval(),
            log_filter: env::log_filter(),
        })
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid listen address: {0}")]
    InvalidAddr(String),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the stderr tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A bound, not yet running daemon.
pub struct Daemon {
    listener: Listener,
    ctx: Arc<ListenCtx>,
    addr: SocketAddr,
    prune_interval: Duration,
}

/// Bind the listener and build the shared context.
pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    let tcp = TcpListener::bind(config.addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.addr, e))?;
    let addr = tcp.local_addr()?;

    let binder = Binder::with_registry(Arc::new(ConnectionRegistry::new()));
    let ctx = Arc::new(ListenCtx::new(binder, config.ipc_timeout, CancellationToken::new()));
    let listener = Listener::new(tcp, Arc::clone(&ctx));

    info!(%addr, "daemon listening");
    Ok(Daemon { listener, ctx, addr, prune_interval: config.prune_interval })
}

impl Daemon {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Token that stops the daemon when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.ctx.shutdown.clone()
    }

    pub fn context(&self) -> &Arc<ListenCtx> {
        &self.ctx
    }

    /// Serve until the shutdown token is cancelled.
    pub async fn run(self) {
        let prune = tokio::spawn(prune_loop(Arc::clone(&self.ctx), self.prune_interval));
        self.listener.run().await;
        prune.abort();
        info!("Daemon shutdown complete");
    }

    /// Serve until ctrl-c or the shutdown token is cancelled.
    pub async fn run_until_ctrl_c(self) {
        let token = self.shutdown_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {}", e);
                return;
            }
            info!("Received ctrl-c, shutting down...");
            token.cancel();
        });
        self.run().await;
    }
}

/// Periodically sweep registry entries whose connection has gone away.
async fn prune_loop(ctx: Arc<ListenCtx>, every: Duration) {
    let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
    interval.tick().await;
    loop {
        tokio::select! {
            _ = ctx.shutdown.cancelled() => return,
            _ = interval.tick() => {
                let pruned = ctx.binder.registry().prune();
                if pruned > 0 {
                    debug!(pruned, "pruned dead registry entries");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
