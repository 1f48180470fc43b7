//! Frame writer
//!
//! Serializes requests into the inline command format.
//!
//! ## Wire Format
//! ```text
//! CMD arg1 arg2\r\n                    (inline command)
//! CMD key [param] <len>\r\n<len bytes>\r\n  (command with payload)
//! ```

use std::io::{BufWriter, Write};

use crate::error::Result;
use super::scalar::encode_str;
use super::Request;

/// Line terminator used by both ends
pub const CRLF: &[u8] = b"\r\n";

/// Encode a request to bytes
///
/// Tokens are joined by single spaces. When a payload is present its length
/// becomes the final token and the payload follows the command line.
pub fn encode_request(request: &Request) -> Vec<u8> {
    let line = request.tokens().join(" ");

    match request.payload_bytes() {
        None => {
            let mut message = Vec::with_capacity(line.len() + CRLF.len());
            message.extend_from_slice(encode_str(&line));
            message.extend_from_slice(CRLF);
            message
        }
        Some(payload) => {
            let header = format!("{} {}", line, payload.len());
            let mut message =
                Vec::with_capacity(header.len() + payload.len() + 2 * CRLF.len());
            message.extend_from_slice(encode_str(&header));
            message.extend_from_slice(CRLF);
            message.extend_from_slice(payload);
            message.extend_from_slice(CRLF);
            message
        }
    }
}

/// Buffered writer for request frames
pub struct FrameWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> FrameWriter<W> {
    /// Wrap a stream with the default buffer size
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
        }
    }

    /// Wrap a stream with an explicit buffer size
    pub fn with_capacity(capacity: usize, inner: W) -> Self {
        Self {
            inner: BufWriter::with_capacity(capacity, inner),
        }
    }

    /// Write one request and flush it to the stream
    pub fn write_request(&mut self, request: &Request) -> Result<()> {
        tracing::trace!("-> {}", request.tokens().join(" "));

        self.inner.write_all(&encode_request(request))?;
        self.inner.flush()?;
        Ok(())
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Take the stream back, dropping any bytes a failed write left buffered
    pub fn discard(self) -> W {
        let (inner, _unsent) = self.inner.into_parts();
        inner
    }
}
