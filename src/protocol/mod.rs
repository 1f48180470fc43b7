//! Protocol Module
//!
//! Defines the wire format spoken with the server.
//!
//! ## Request Format (inline)
//! ```text
//! ┌─────────┬───┬──────┬───┬──────┬──────┐
//! │ COMMAND │ ␠ │ arg1 │ ␠ │ argN │ \r\n │
//! └─────────┴───┴──────┴───┴──────┴──────┘
//! ```
//! A command carrying a value appends the value's byte length as the last
//! token, then sends the raw bytes and a final `\r\n`.
//!
//! ## Response Format
//! ```text
//! ┌─────────┬──────────────────────────────┐
//! │ Tag (1) │ Body                         │
//! └─────────┴──────────────────────────────┘
//! ```
//!
//! ### Tags
//! - `+`: status line
//! - `-`: error line
//! - `:`: integer line
//! - `$`: length line, then raw bytes (length -1 means no value)
//! - `*`: count line, then that many `$` frames

mod command;
mod response;
pub mod scalar;
mod reader;
mod writer;

pub use command::{Request, ToArg};
pub use response::ResponseType;
pub use scalar::Timestamp;
pub use reader::{FrameReader, MAX_BULK_LEN};
pub use writer::{encode_request, FrameWriter, CRLF};
