//! # kvwire
//!
//! Wire-level codec core for key-value servers that speak the inline,
//! type-tagged request/response protocol:
//! - Inline command encoding with optional length-prefixed payloads
//! - Tagged response decoding (status, integer, bulk, multi-bulk)
//! - Scalar encodings for doubles, timestamps and durations
//! - Fail-fast connections that fault permanently on any error
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Caller (command API, CLI)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │              (Usable → Faulted state check)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ FrameWriter │          │ FrameReader │
//!   │  (inline)   │          │  (tagged)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌──────────────┐
//!              │ Scalar Codec │
//!              └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvwire::{ClientConfig, Connection, Request};
//!
//! let config = ClientConfig::builder().addr("127.0.0.1:6379").build();
//! let mut conn = Connection::connect(&config)?;
//!
//! conn.write_command(&Request::new("SET").arg("greeting").payload("hello"))?;
//! assert!(conn.read_ok()?);
//!
//! conn.write_command(&Request::new("GET").arg("greeting"))?;
//! assert_eq!(conn.read_bulk()?.as_deref(), Some("hello"));
//! # Ok::<(), kvwire::WireError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::ClientConfig;
pub use network::{Connection, ConnectionState};
pub use protocol::{Request, ResponseType, Timestamp, ToArg};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
