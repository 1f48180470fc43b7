//! Connection
//!
//! The session core: owns one stream and routes every request and response
//! through a fail-fast state check.
//!
//! ## State Machine
//! ```text
//! ┌────────┐  any write/read error  ┌─────────┐
//! │ Usable │ ─────────────────────▶ │ Faulted │ (terminal, stream dropped)
//! └────────┘                        └─────────┘
//! ```
//!
//! A faulted connection rejects every further call with
//! [`WireError::Faulted`] without touching the stream. Build a new
//! connection to continue.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{Result, WireError};
use crate::protocol::scalar::{decode_str, parse_double, parse_duration, parse_timestamp};
use crate::protocol::{FrameReader, FrameWriter, Request, ResponseType, Timestamp, ToArg};

/// Usability of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Requests may be written and responses read
    Usable,

    /// A protocol or transport error occurred; the stream has been released
    Faulted,
}

/// Both halves of the stream, present only while usable
struct Channel<R: Read, W: Write> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
}

/// A client connection speaking the inline protocol
///
/// Not safe for concurrent use: interleaved requests would corrupt frame
/// boundaries, so every operation takes `&mut self`.
pub struct Connection<R: Read = TcpStream, W: Write = TcpStream> {
    /// Stream halves; `None` once faulted
    channel: Option<Channel<R, W>>,

    /// Current state
    state: ConnectionState,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream, TcpStream> {
    /// Open a TCP connection to `config.addr`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect(&config.addr)?;
        stream.set_nodelay(config.nodelay)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.addr.clone());

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let mut connection = Self::with_config(read_stream, stream, config);
        connection.peer_addr = peer_addr;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }
}

impl<R: Read, W: Write> Connection<R, W> {
    /// Wrap a read half and a write half with the default configuration
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, &ClientConfig::default())
    }

    /// Wrap a read half and a write half
    pub fn with_config(reader: R, writer: W, config: &ClientConfig) -> Self {
        Self {
            channel: Some(Channel {
                reader: FrameReader::with_capacity(
                    config.read_buffer_size,
                    config.max_bulk_len,
                    reader,
                ),
                writer: FrameWriter::with_capacity(config.write_buffer_size, writer),
            }),
            state: ConnectionState::Usable,
            peer_addr: config.addr.clone(),
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True once an error has torn the connection down
    pub fn is_faulted(&self) -> bool {
        self.state == ConnectionState::Faulted
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Release the stream
    pub fn close(self) {
        tracing::debug!("Closing connection to {}", self.peer_addr);
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write one request
    pub fn write_command(&mut self, request: &Request) -> Result<()> {
        self.write_core(|w| w.write_request(request))
    }

    /// Write `COMMAND arg1 arg2 ...`
    pub fn write_cmd<I>(&mut self, command: &str, args: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.write_command(&Request::new(command).args(args))
    }

    /// Write `COMMAND key key1 key2 ...`
    pub fn write_keys<I>(&mut self, command: &str, key: &str, keys: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.write_command(&Request::new(command).arg(key).args(keys))
    }

    /// Write `COMMAND key <len>` followed by the value bytes
    pub fn write_value(&mut self, command: &str, key: &str, value: impl Into<Bytes>) -> Result<()> {
        self.write_command(&Request::new(command).arg(key).payload(value))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read an integer reply as `i32`
    pub fn read_int(&mut self) -> Result<i32> {
        self.read_core(ResponseType::Integer, |r| r.read_number_line())
    }

    /// Read an integer reply as `i64`
    pub fn read_int64(&mut self) -> Result<i64> {
        self.read_core(ResponseType::Integer, |r| r.read_number_line64())
    }

    /// Read an integer reply; only `1` is true
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_core(ResponseType::Integer, |r| Ok(r.read_number_line()? == 1))
    }

    /// Read a status reply and check for `OK`
    pub fn read_ok(&mut self) -> Result<bool> {
        self.read_status("OK")
    }

    /// Read a status reply and compare it with `expected`
    ///
    /// A different status is `Ok(false)` and leaves the connection usable.
    pub fn read_status(&mut self, expected: &str) -> Result<bool> {
        self.read_core(ResponseType::SingleLine, |r| {
            Ok(r.read_status_line()? == expected)
        })
    }

    /// Read a bulk reply as text
    pub fn read_bulk(&mut self) -> Result<Option<String>> {
        self.read_core(ResponseType::Bulk, |r| {
            r.read_bulk_body()?.map(decode_str).transpose()
        })
    }

    /// Read a bulk reply as raw bytes
    pub fn read_bulk_raw(&mut self) -> Result<Option<Bytes>> {
        self.read_core(ResponseType::Bulk, |r| Ok(r.read_bulk_body()?.map(Bytes::from)))
    }

    /// Read a multi-bulk reply as text entries
    pub fn read_multi_bulk(&mut self) -> Result<Vec<Option<String>>> {
        self.read_core(ResponseType::MultiBulk, |r| {
            r.read_multi_bulk_body()?
                .into_iter()
                .map(|entry| entry.map(decode_str).transpose())
                .collect()
        })
    }

    /// Read a multi-bulk reply as raw entries
    pub fn read_multi_bulk_raw(&mut self) -> Result<Vec<Option<Bytes>>> {
        self.read_core(ResponseType::MultiBulk, |r| {
            Ok(r.read_multi_bulk_body()?
                .into_iter()
                .map(|entry| entry.map(Bytes::from))
                .collect())
        })
    }

    /// Read a bulk reply holding a double
    pub fn read_double(&mut self) -> Result<Option<f64>> {
        self.read_bulk_scalar(parse_double)
    }

    /// Read a bulk reply holding seconds since the Unix epoch
    pub fn read_timestamp(&mut self) -> Result<Option<Timestamp>> {
        self.read_bulk_scalar(parse_timestamp)
    }

    /// Read a bulk reply holding a number of seconds
    pub fn read_duration(&mut self) -> Result<Option<Duration>> {
        self.read_bulk_scalar(parse_duration)
    }

    fn read_bulk_scalar<T>(&mut self, parse: fn(&str) -> Result<T>) -> Result<Option<T>> {
        self.read_core(ResponseType::Bulk, |r| {
            r.read_bulk_body()?
                .map(|raw| decode_str(raw).and_then(|text| parse(&text)))
                .transpose()
        })
    }

    // =========================================================================
    // Core
    // =========================================================================

    fn write_core<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut FrameWriter<W>) -> Result<()>,
    {
        let channel = self.ensure_usable()?;
        let result = write(&mut channel.writer);
        result.map_err(|e| self.fault(e))
    }

    fn read_core<T, F>(&mut self, expected: ResponseType, read: F) -> Result<T>
    where
        F: FnOnce(&mut FrameReader<R>) -> Result<T>,
    {
        let reader = &mut self.ensure_usable()?.reader;
        let result = reader.expect_type(expected).and_then(|()| read(reader));
        result.map_err(|e| self.fault(e))
    }

    fn ensure_usable(&mut self) -> Result<&mut Channel<R, W>> {
        match (self.state, self.channel.as_mut()) {
            (ConnectionState::Usable, Some(channel)) => Ok(channel),
            _ => Err(WireError::Faulted),
        }
    }

    /// Move to the faulted state and drop the stream
    fn fault(&mut self, error: WireError) -> WireError {
        tracing::warn!("Connection to {} faulted: {}", self.peer_addr, error);
        self.state = ConnectionState::Faulted;
        if let Some(channel) = self.channel.take() {
            // Unsent bytes must not reach the stream on drop
            drop(channel.writer.discard());
        }
        error
    }
}
