//! Error types for kvwire
//!
//! Every failure surfaced by the codec core is a [`WireError`]. Apart from
//! [`WireError::Faulted`], any error returned by a connection operation has
//! already moved that connection into the faulted state.

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::protocol::ResponseType;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for kvwire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse {
        expected: ResponseType,
        actual: ResponseType,
    },

    #[error("Unknown response tag: 0x{0:02x}")]
    UnknownTag(u8),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// An error frame arrived where another frame type was expected
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("Format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("Connection is faulted and can no longer be used")]
    Faulted,
}

impl WireError {
    /// True for errors caused by the peer breaking the frame grammar
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            WireError::UnexpectedResponse { .. }
                | WireError::UnknownTag(_)
                | WireError::Protocol(_)
                | WireError::Server(_)
        )
    }

    /// True if the underlying stream failed
    pub fn is_transport(&self) -> bool {
        matches!(self, WireError::Io(_))
    }
}
