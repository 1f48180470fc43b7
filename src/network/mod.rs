//! Network Module
//!
//! Client connection handling.
//!
//! ## Model
//! - One blocking stream per connection, owned by the caller
//! - Every request/response passes through a faulted-state check
//! - Any error tears the connection down permanently

mod connection;

pub use connection::{Connection, ConnectionState};
