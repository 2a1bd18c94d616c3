// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP client for the tether daemon.

use std::time::Duration;

use serde::Serialize;
use tether_core::SessionId;
use tether_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running at {addr}: {source}")]
    NotRunning {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Rejected(String),

    #[error("unexpected response: {0:?}")]
    Unexpected(Box<Response>),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        matches!(
            self,
            ClientError::NotRunning { .. } | ClientError::Protocol(ProtocolError::Timeout)
        )
    }
}

/// Daemon status as reported by `Request::Status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub sessions: usize,
    pub connections: usize,
}

/// Client for one daemon address.
///
/// Each call opens its own connection; the daemon binds a fresh session to
/// every connection it accepts.
pub struct DaemonClient {
    addr: String,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self { addr: addr.into(), timeout }
    }

    /// Client for `addr`, or `TETHER_ADDR` / the default address when absent.
    pub fn from_env(addr: Option<String>) -> Self {
        let addr = addr.unwrap_or_else(tether_daemon::env::listen_addr);
        Self::new(addr, tether_daemon::env::ipc_timeout())
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn open(&self) -> Result<Connection, ClientError> {
        let not_running = |source| ClientError::NotRunning { addr: self.addr.clone(), source };
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| ProtocolError::Timeout)?
            .map_err(not_running)?;
        Ok(Connection { stream, timeout: self.timeout })
    }

    /// Send one request on a fresh connection and return the response.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.open().await?.call(request).await
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(ClientError::Unexpected(Box::new(other))),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { uptime_secs, sessions, connections } => {
                Ok(DaemonStatus { uptime_secs, sessions, connections })
            }
            other => Self::reject(other),
        }
    }

    /// Queue `body` for session `to`.
    ///
    /// `from` only labels the message; without it the recipient sees the
    /// ephemeral id the daemon generated for this connection.
    pub async fn send_message(
        &self,
        to: SessionId,
        body: String,
        from: Option<SessionId>,
    ) -> Result<(), ClientError> {
        match self.send(&Request::Send { to, body, from }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    /// Open a long-lived connection bound to `session` (or a generated id).
    pub async fn listen(&self, session: Option<SessionId>) -> Result<Subscription, ClientError> {
        let mut conn = self.open().await?;
        let (session, resumed) = conn.hello(session).await?;
        Ok(Subscription { conn, session, resumed })
    }
}

struct Connection {
    stream: TcpStream,
    timeout: Duration,
}

impl Connection {
    async fn call(&mut self, request: &Request) -> Result<Response, ClientError> {
        let (mut reader, mut writer) = self.stream.split();
        wire::write_request(&mut writer, request, self.timeout).await?;
        Ok(wire::read_response(&mut reader, self.timeout).await?)
    }

    async fn hello(
        &mut self,
        session: Option<SessionId>,
    ) -> Result<(SessionId, bool), ClientError> {
        match self.call(&Request::Hello { session }).await? {
            Response::Welcome { session, resumed } => Ok((session, resumed)),
            other => DaemonClient::reject(other),
        }
    }
}

/// A connection held open to receive pushed messages.
pub struct Subscription {
    conn: Connection,
    session: SessionId,
    resumed: bool,
}

impl Subscription {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// True when the daemon reported the requested id was already ours.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Wait for the next pushed message.
    ///
    /// Waits without a timeout; a listener may sit idle indefinitely.
    pub async fn next_message(&mut self) -> Result<(SessionId, String), ClientError> {
        loop {
            let bytes = wire::read_message(&mut self.conn.stream).await?;
            match wire::decode::<Response>(&bytes)? {
                Response::Message { from, body } => return Ok((from, body)),
                Response::Error { message } => return Err(ClientError::Rejected(message)),
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
