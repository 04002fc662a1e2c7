//! TCP Transport
//!
//! One TCP connection to the service, shared by every client built on it.
//!
//! ## Round Trip
//!
//! ```text
//! 1. Lock the connection
//!        │
//!        ▼
//! 2. Serialize the command as a RESP array and flush it
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Parse the read buffer       │──── complete ───> 4. Return the reply
//!    │        │ incomplete          │
//!    │        ▼                     │
//!    │  Read more bytes from socket │
//!    │        │                     │
//!    │   [Loop back]                │
//!    └──────────────────────────────┘
//! ```
//!
//! ## Buffer Management
//!
//! Replies accumulate in a `BytesMut` buffer because TCP is a stream: a read
//! may return part of a reply. The buffer is bounded by
//! [`ClientConfig::max_reply_size`](crate::ClientConfig).
//!
//! ## Cancellation
//!
//! If a `submit` future is dropped after writing but before its reply is
//! read, the next reply on the wire belongs to nobody. The connection is
//! marked poisoned for the whole round trip and only cleared once the reply
//! is consumed, so an abandoned call turns later calls into
//! [`TransportError::Poisoned`] instead of handing them a stale reply.

use crate::commands::Command;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::protocol::{RespParser, RespValue};
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Initial read buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Counters for one transport.
#[derive(Debug, Default)]
pub struct TransportStats {
    /// Commands written to the socket
    pub commands_sent: AtomicU64,
    /// Complete replies parsed
    pub replies_received: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl TransportStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn command_sent(&self, bytes: usize) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    fn reply_received(&self) {
        self.replies_received.fetch_add(1, Ordering::Relaxed);
    }

    fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Per-connection state, guarded by the transport's mutex.
struct Connection {
    stream: BufWriter<TcpStream>,
    buffer: BytesMut,
    write_buf: Vec<u8>,
    parser: RespParser,
    max_buffer_size: usize,
    poisoned: bool,
}

impl Connection {
    async fn round_trip(
        &mut self,
        command: &Command,
        peer: SocketAddr,
        stats: &TransportStats,
    ) -> Result<RespValue, TransportError> {
        if self.poisoned {
            return Err(TransportError::Poisoned);
        }
        self.poisoned = true;

        self.write_buf.clear();
        command.to_resp().serialize_into(&mut self.write_buf);
        self.stream.write_all(&self.write_buf).await?;
        self.stream.flush().await?;
        stats.command_sent(self.write_buf.len());
        trace!(server = %peer, bytes = self.write_buf.len(), "Sent command");

        loop {
            if let Some(reply) = self.try_parse_reply(peer)? {
                stats.reply_received();
                self.poisoned = false;
                return Ok(reply);
            }
            self.read_more_data(peer, stats).await?;
        }
    }

    fn try_parse_reply(&mut self, peer: SocketAddr) -> Result<Option<RespValue>, TransportError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer) {
            Ok(Some((value, consumed))) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    server = %peer,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed reply"
                );
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(server = %peer, buffered = self.buffer.len(), "Incomplete reply, need more data");
                Ok(None)
            }
            Err(e) => {
                warn!(server = %peer, error = %e, "Reply parse error");
                Err(TransportError::Parse(e))
            }
        }
    }

    async fn read_more_data(
        &mut self,
        peer: SocketAddr,
        stats: &TransportStats,
    ) -> Result<(), TransportError> {
        if self.buffer.len() >= self.max_buffer_size {
            warn!(server = %peer, size = self.buffer.len(), "Reply buffer limit exceeded");
            return Err(TransportError::BufferFull {
                limit: self.max_buffer_size,
            });
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;
        if n == 0 {
            return Err(if self.buffer.is_empty() {
                TransportError::ConnectionClosed
            } else {
                TransportError::UnexpectedEof
            });
        }

        stats.bytes_read(n);
        trace!(server = %peer, bytes = n, "Read data");
        Ok(())
    }
}

/// A [`Transport`] over a single TCP connection.
///
/// Submissions are serialized by an async mutex: each one owns the
/// connection for its full write/read round trip.
pub struct TcpTransport {
    peer: SocketAddr,
    conn: Mutex<Connection>,
    stats: Arc<TransportStats>,
}

impl TcpTransport {
    /// Connects to the service named by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(config.address()).await?;
        Self::from_stream(stream, config)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream, config: &ClientConfig) -> Result<Self, TransportError> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        debug!(server = %peer, "Connected to filter service");

        Ok(Self {
            peer,
            conn: Mutex::new(Connection {
                stream: BufWriter::new(stream),
                buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
                write_buf: Vec::with_capacity(INITIAL_BUFFER_SIZE),
                parser: RespParser::with_max_bulk_size(config.max_reply_size),
                max_buffer_size: config.max_reply_size,
                poisoned: false,
            }),
            stats: Arc::new(TransportStats::new()),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn stats(&self) -> Arc<TransportStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn submit(&self, command: &Command) -> Result<RespValue, TransportError> {
        let mut conn = self.conn.lock().await;
        let result = conn.round_trip(command, self.peer, &self.stats).await;
        if let Err(e) = &result {
            match e {
                TransportError::ConnectionClosed => {
                    debug!(server = %self.peer, "Server closed the connection")
                }
                TransportError::Poisoned => {}
                _ => warn!(server = %self.peer, error = %e, "Transport error"),
            }
        }
        result
    }
}
