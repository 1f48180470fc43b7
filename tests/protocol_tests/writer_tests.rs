//! Writer Tests
//!
//! Tests for inline request encoding, checked byte for byte.

use std::io::{self, Write};
use std::time::Duration;

use kvwire::protocol::{encode_request, FrameWriter, Request};
use kvwire::WireError;

// =============================================================================
// Inline Command Tests
// =============================================================================

#[test]
fn test_encode_command_with_key_and_integer() {
    let request = Request::new("CMD").arg("k").arg(7);
    assert_eq!(encode_request(&request), b"CMD k 7\r\n");
}

#[test]
fn test_encode_command_without_arguments() {
    assert_eq!(encode_request(&Request::new("PING")), b"PING\r\n");
}

#[test]
fn test_encode_key_followed_by_key_list() {
    let request = Request::new("SUNION").arg("a").args(["b", "c", "d"]);
    assert_eq!(encode_request(&request), b"SUNION a b c d\r\n");
}

#[test]
fn test_encode_key_param_and_key_list() {
    let request = Request::new("SMOVE").arg("src").arg(3).args(vec!["x".to_string()]);
    assert_eq!(encode_request(&request), b"SMOVE src 3 x\r\n");
}

#[test]
fn test_encode_scalar_arguments() {
    let request = Request::new("ZADD")
        .arg("scores")
        .arg(1.0)
        .arg(f64::NEG_INFINITY)
        .arg(true)
        .arg(Duration::from_secs(90));
    assert_eq!(encode_request(&request), b"ZADD scores 1.0 -inf 1 90\r\n");
}

#[test]
fn test_encode_does_not_escape_whitespace() {
    let request = Request::new("GET").arg("two words");
    assert_eq!(encode_request(&request), b"GET two words\r\n");
}

// =============================================================================
// Payload Tests
// =============================================================================

#[test]
fn test_encode_payload_appends_length() {
    let request = Request::new("SET").arg("k").payload("hello");
    assert_eq!(encode_request(&request), b"SET k 5\r\nhello\r\n");
}

#[test]
fn test_encode_payload_with_param() {
    let request = Request::new("LSET").arg("list").arg(2).payload("v");
    assert_eq!(encode_request(&request), b"LSET list 2 1\r\nv\r\n");
}

#[test]
fn test_encode_payload_length_counts_bytes() {
    let request = Request::new("SET").arg("k").payload("héllo");
    assert_eq!(encode_request(&request), "SET k 6\r\nhéllo\r\n".as_bytes());
}

#[test]
fn test_encode_empty_payload() {
    let request = Request::new("SET").arg("k").payload(Vec::<u8>::new());
    assert_eq!(encode_request(&request), b"SET k 0\r\n\r\n");
}

#[test]
fn test_encode_binary_payload_with_line_breaks() {
    let request = Request::new("SET").arg("bin").payload(vec![0u8, b'\r', b'\n', 0xff]);
    assert_eq!(encode_request(&request), b"SET bin 4\r\n\x00\r\n\xff\r\n");
}

// =============================================================================
// Request Accessor Tests
// =============================================================================

#[test]
fn test_request_accessors() {
    let request = Request::new("SET").arg("k").payload("v");

    assert_eq!(request.command(), "SET");
    assert_eq!(request.tokens(), ["SET".to_string(), "k".to_string()]);
    assert_eq!(request.payload_bytes().map(|p| &p[..]), Some(&b"v"[..]));
}

// =============================================================================
// Stream Writer Tests
// =============================================================================

#[test]
fn test_write_request_flushes_to_stream() {
    let mut writer = FrameWriter::new(Vec::new());

    writer.write_request(&Request::new("GET").arg("a")).unwrap();
    writer.write_request(&Request::new("SET").arg("a").payload("1")).unwrap();

    assert_eq!(writer.get_ref().as_slice(), b"GET a\r\nSET a 1\r\n1\r\n");
}

#[test]
fn test_write_request_with_small_buffer() {
    let mut writer = FrameWriter::with_capacity(4, Vec::new());
    let payload = vec![b'x'; 100];

    writer.write_request(&Request::new("SET").arg("big").payload(payload.clone())).unwrap();

    let mut expected = b"SET big 100\r\n".to_vec();
    expected.extend_from_slice(&payload);
    expected.extend_from_slice(b"\r\n");
    assert_eq!(writer.get_ref(), &expected);
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_request_reports_io_error() {
    let mut writer = FrameWriter::new(BrokenPipe);
    let err = writer.write_request(&Request::new("PING")).unwrap_err();

    assert!(matches!(err, WireError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(err.is_transport());
}
