//! Command requests
//!
//! A [`Request`] is a command name, its inline arguments, and an optional raw
//! payload sent after the command line.

use std::time::Duration;

use bytes::Bytes;

use super::scalar::{format_double, format_duration, format_timestamp, Timestamp};

/// Conversion of a scalar into a single inline argument token
///
/// Tokens are sent verbatim. Values containing spaces or line breaks are not
/// escaped and will be split by the server.
pub trait ToArg {
    fn to_arg(&self) -> String;
}

impl ToArg for str {
    fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl ToArg for String {
    fn to_arg(&self) -> String {
        self.clone()
    }
}

impl ToArg for bool {
    fn to_arg(&self) -> String {
        let digit = if *self { "1" } else { "0" };
        digit.to_string()
    }
}

impl ToArg for f64 {
    fn to_arg(&self) -> String {
        format_double(*self)
    }
}

impl ToArg for Timestamp {
    fn to_arg(&self) -> String {
        format_timestamp(*self)
    }
}

impl ToArg for Duration {
    fn to_arg(&self) -> String {
        format_duration(*self)
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> String {
        (**self).to_arg()
    }
}

macro_rules! impl_to_arg_for_integers {
    ($($ty:ty),*) => {
        $(
            impl ToArg for $ty {
                fn to_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_to_arg_for_integers!(i32, i64, u32, u64, usize);

/// A single command ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    tokens: Vec<String>,
    payload: Option<Bytes>,
}

impl Request {
    /// Start a request for the given command name
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            tokens: vec![command.into()],
            payload: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, value: impl ToArg) -> Self {
        self.tokens.push(value.to_arg());
        self
    }

    /// Append every argument of a list, in order
    pub fn args<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.tokens.extend(values.into_iter().map(|v| v.to_arg()));
        self
    }

    /// Attach a raw payload; its byte length is sent as the last inline token
    pub fn payload(mut self, value: impl Into<Bytes>) -> Self {
        self.payload = Some(value.into());
        self
    }

    /// Command name
    pub fn command(&self) -> &str {
        &self.tokens[0]
    }

    /// Command name followed by the arguments
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Raw payload, if any
    pub fn payload_bytes(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }
}
