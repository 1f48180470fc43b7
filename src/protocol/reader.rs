//! Frame reader
//!
//! Parses tagged response frames from a buffered stream.
//!
//! ## Wire Format
//! ```text
//! +OK\r\n                         single line
//! -ERR message\r\n                error
//! :42\r\n                         integer
//! $5\r\nhello\r\n                 bulk ($-1\r\n is absent)
//! *2\r\n$1\r\na\r\n$-1\r\n        multi-bulk of bulk frames
//! ```

use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::error::{Result, WireError};
use super::scalar::decode_str;
use super::ResponseType;

/// Default upper bound for a bulk length or multi-bulk count (512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Buffered reader for response frames
pub struct FrameReader<R: Read> {
    inner: BufReader<R>,
    max_bulk_len: usize,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a stream with the default buffer size and bulk limit
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_bulk_len: MAX_BULK_LEN,
        }
    }

    /// Wrap a stream with an explicit buffer size and bulk limit
    pub fn with_capacity(capacity: usize, max_bulk_len: usize, inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            max_bulk_len,
        }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Read the tag byte of the next frame
    pub fn read_type(&mut self) -> Result<ResponseType> {
        let mut tag = [0u8; 1];
        self.inner.read_exact(&mut tag)?;

        let response_type = ResponseType::from_tag(tag[0]).ok_or(WireError::UnknownTag(tag[0]))?;
        tracing::trace!("<- {}", response_type);
        Ok(response_type)
    }

    /// Read the next tag and check that it is the expected frame type
    ///
    /// An error frame in place of the expected type is consumed and reported
    /// with the server's message.
    pub fn expect_type(&mut self, expected: ResponseType) -> Result<()> {
        let actual = self.read_type()?;
        if actual == expected {
            return Ok(());
        }

        if actual == ResponseType::Error {
            return Err(WireError::Server(self.read_line()?));
        }
        Err(WireError::UnexpectedResponse { expected, actual })
    }

    // =========================================================================
    // Lines
    // =========================================================================

    /// Read one line without its terminator
    ///
    /// Lines end in CRLF; a bare LF is accepted too.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        let read = self.inner.read_until(b'\n', &mut line)?;

        if read == 0 || line.last() != Some(&b'\n') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended inside a line",
            )
            .into());
        }

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        decode_str(line)
    }

    /// Read the body of a single-line frame
    pub fn read_status_line(&mut self) -> Result<String> {
        self.read_line()
    }

    /// Read a line holding a 32-bit signed integer
    pub fn read_number_line(&mut self) -> Result<i32> {
        self.read_parsed_line()
    }

    /// Read a line holding a 64-bit signed integer
    pub fn read_number_line64(&mut self) -> Result<i64> {
        self.read_parsed_line()
    }

    fn read_parsed_line<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let line = self.read_line()?;
        line.parse::<T>()
            .map_err(|e| WireError::Format(format!("invalid integer {:?}: {}", line, e)))
    }

    // =========================================================================
    // Bulk
    // =========================================================================

    /// Read a length line checked against the bulk limit
    ///
    /// Returns `None` for a negative length.
    pub fn read_length(&mut self) -> Result<Option<usize>> {
        let length = self.read_number_line64()?;
        if length < 0 {
            return Ok(None);
        }

        let length = usize::try_from(length)
            .ok()
            .filter(|len| *len <= self.max_bulk_len)
            .ok_or_else(|| {
                WireError::Protocol(format!(
                    "length too large: {} (max {})",
                    length, self.max_bulk_len
                ))
            })?;
        Ok(Some(length))
    }

    /// Read exactly `length` raw bytes and the terminator that follows them
    pub fn read_bulk(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut body = vec![0u8; length];
        self.inner.read_exact(&mut body)?;

        let trailer = self.read_line()?;
        if !trailer.is_empty() {
            return Err(WireError::Protocol(format!(
                "bulk of {} bytes not followed by a line terminator",
                length
            )));
        }
        Ok(body)
    }

    /// Read a bulk body after its tag: length line, then the bytes if present
    pub fn read_bulk_body(&mut self) -> Result<Option<Vec<u8>>> {
        match self.read_length()? {
            Some(length) => self.read_bulk(length).map(Some),
            None => Ok(None),
        }
    }

    /// Read a multi-bulk body after its tag
    ///
    /// Every element must be a bulk frame. The result has exactly as many
    /// entries as the declared count; absent elements are `None`.
    pub fn read_multi_bulk_body(&mut self) -> Result<Vec<Option<Vec<u8>>>> {
        let count = self.read_length()?.ok_or_else(|| {
            WireError::Protocol("negative multi-bulk count".to_string())
        })?;

        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let actual = self.read_type()?;
            if actual != ResponseType::Bulk {
                return Err(WireError::UnexpectedResponse {
                    expected: ResponseType::Bulk,
                    actual,
                });
            }
            entries.push(self.read_bulk_body()?);
        }
        Ok(entries)
    }
}
