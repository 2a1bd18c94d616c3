// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener accepts TCP connections and spawns one task per connection.
//! That task owns the socket and runs every binder call for its connection:
//! `create` on accept, `reload` on Hello, the outbox drain on wake, and
//! `destroy` on close. Frames are read by a helper task and handed over a
//! channel so the connection task can also wait on its flush signal.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tether_core::{Conn, Session, SessionBinder};
use tether_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::connection::Connection;
use crate::mailbox::Mailbox;

/// Binder specialised for daemon connections and mailboxes.
pub type Binder = SessionBinder<Connection, Mailbox>;

/// Frames buffered between the reader helper and the connection task.
const FRAME_BUFFER: usize = 16;

/// Shared daemon context for all connection tasks.
pub struct ListenCtx {
    pub binder: Binder,
    pub start_time: Instant,
    /// Connections currently being served.
    pub connections: AtomicUsize,
    pub ipc_timeout: Duration,
    pub shutdown: CancellationToken,
}

impl ListenCtx {
    pub fn new(binder: Binder, ipc_timeout: Duration, shutdown: CancellationToken) -> Self {
        Self {
            binder,
            start_time: Instant::now(),
            connections: AtomicUsize::new(0),
            ipc_timeout,
            shutdown,
        }
    }
}

/// Listener task for accepting socket connections.
pub struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.tcp.local_addr()
    }

    /// Run the accept loop until shutdown, spawning a task per connection.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.ctx.shutdown.cancelled() => {
                    info!("listener shutting down");
                    return;
                }
                result = self.tcp.accept() => match result {
                    Ok((stream, peer)) => {
                        debug!("TCP connection from {}", peer);
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            serve(reader, writer, peer, &ctx).await;
                        });
                    }
                    Err(e) => error!("TCP accept error: {}", e),
                },
            }
        }
    }
}

/// Serve one connection from open to close.
///
/// The session is destroyed however the connection ends.
pub async fn serve<R, W>(reader: R, writer: W, peer: SocketAddr, ctx: &ListenCtx)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let conn = Connection::new(peer);
    ctx.connections.fetch_add(1, Ordering::Relaxed);
    let session = ctx.binder.create(&conn);
    info!(
        conn = %conn.conn_id(),
        peer = %conn.peer(),
        session = %session.id(),
        "connection opened"
    );

    if let Err(e) = handle_connection(reader, writer, &conn, ctx).await {
        log_connection_error(e);
    }

    ctx.binder.destroy(&conn);
    ctx.connections.fetch_sub(1, Ordering::Relaxed);
    info!(conn = %conn.conn_id(), peer = %conn.peer(), "connection closed");
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle requests and flushes for one connection until it closes.
///
/// Generic over reader/writer types so tests can drive it over an in-memory
/// duplex stream.
pub async fn handle_connection<R, W>(
    reader: R,
    mut writer: W,
    conn: &Arc<Connection>,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::channel(FRAME_BUFFER);
    let reader_task = tokio::spawn(read_frames(reader, tx));
    let result = pump(&mut rx, &mut writer, conn, ctx).await;
    reader_task.abort();
    result
}

/// Read frames until the stream ends or the receiver goes away.
///
/// Runs on its own task because `read_message` loses partial frames when
/// cancelled, and the connection task must be free to select on flushes.
async fn read_frames<R>(mut reader: R, tx: mpsc::Sender<Result<Vec<u8>, ProtocolError>>)
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame = wire::read_message(&mut reader).await;
        let last = frame.is_err();
        if tx.send(frame).await.is_err() || last {
            return;
        }
    }
}

async fn pump<W>(
    rx: &mut mpsc::Receiver<Result<Vec<u8>, ProtocolError>>,
    writer: &mut W,
    conn: &Arc<Connection>,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = ctx.shutdown.cancelled() => return Ok(()),
            frame = rx.recv() => {
                let bytes = match frame {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(ProtocolError::ConnectionClosed)) | None => return Ok(()),
                    Some(Err(e)) => return Err(e.into()),
                };
                let response = match wire::decode::<Request>(&bytes) {
                    Ok(request) => {
                        debug!(conn = %conn.conn_id(), request = ?request, "received request");
                        handle_request(request, conn, ctx)
                    }
                    Err(e) => {
                        warn!(conn = %conn.conn_id(), "invalid request: {}", e);
                        Response::Error { message: format!("invalid request: {}", e) }
                    }
                };
                wire::write_response(writer, &response, ctx.ipc_timeout).await?;
            }
            _ = conn.flush_requested() => flush(writer, conn, ctx).await?,
        }
    }
}

/// Handle a single request and return a response.
pub(crate) fn handle_request(
    request: Request,
    conn: &Arc<Connection>,
    ctx: &ListenCtx,
) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { session: None } => {
            let (_, id) = ctx.binder.load(conn);
            Response::Welcome { session: id, resumed: false }
        }

        Request::Hello { session: Some(id) } => {
            if id.is_empty() {
                return Response::Error { message: "session id must not be empty".to_string() };
            }
            let (_, old) = ctx.binder.reload(conn, id.clone());
            let resumed = old == id;
            if !resumed {
                info!(conn = %conn.conn_id(), from = %old, to = %id, "session resumed by id");
            }
            Response::Welcome { session: id, resumed }
        }

        Request::Send { to, body, from } => {
            // An explicit label never rebinds this connection
            let from = match from.filter(|label| !label.is_empty()) {
                Some(label) => label,
                None => ctx.binder.load(conn).1,
            };
            match ctx.binder.wake_by_id(to.as_str(), |mailbox| mailbox.push(from, body)) {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            }
        }

        Request::Status => Response::Status {
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            sessions: ctx.binder.registry().ids().len(),
            connections: ctx.connections.load(Ordering::Relaxed),
        },
    }
}

/// Write out everything queued for this connection's session.
async fn flush<W>(writer: &mut W, conn: &Connection, ctx: &ListenCtx) -> Result<(), ConnectionError>
where
    W: AsyncWrite + Unpin,
{
    let deliveries = ctx.binder.modify(conn, Mailbox::drain).unwrap_or_default();
    if deliveries.is_empty() {
        return Ok(());
    }
    debug!(conn = %conn.conn_id(), count = deliveries.len(), "flushing outbox");
    for delivery in deliveries {
        let message = Response::Message { from: delivery.from, body: delivery.body };
        wire::write_response(writer, &message, ctx.ipc_timeout).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
