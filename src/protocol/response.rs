//! Response frame types
//!
//! Each response frame starts with a single tag byte naming its type.

use std::fmt;

/// Frame kinds a server can answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseType {
    /// Status line, e.g. `+OK`
    SingleLine = b'+',

    /// Error line, e.g. `-ERR unknown command`
    Error = b'-',

    /// Signed decimal integer line
    Integer = b':',

    /// Length-prefixed value; length -1 means no value
    Bulk = b'$',

    /// Count-prefixed sequence of bulk frames
    MultiBulk = b'*',
}

impl ResponseType {
    /// Map a tag byte to its frame type
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'+' => Some(ResponseType::SingleLine),
            b'-' => Some(ResponseType::Error),
            b':' => Some(ResponseType::Integer),
            b'$' => Some(ResponseType::Bulk),
            b'*' => Some(ResponseType::MultiBulk),
            _ => None,
        }
    }

    /// The tag byte that introduces this frame type on the wire
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseType::SingleLine => "single-line",
            ResponseType::Error => "error",
            ResponseType::Integer => "integer",
            ResponseType::Bulk => "bulk",
            ResponseType::MultiBulk => "multi-bulk",
        };
        write!(f, "{} ('{}')", name, self.tag() as char)
    }
}
