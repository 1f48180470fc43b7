//! Reader Tests
//!
//! Tests for tagged response frame parsing.

use std::io::{Cursor, ErrorKind};

use kvwire::protocol::{FrameReader, ResponseType};
use kvwire::WireError;

// =============================================================================
// Helper Functions
// =============================================================================

fn reader(bytes: &[u8]) -> FrameReader<Cursor<Vec<u8>>> {
    FrameReader::new(Cursor::new(bytes.to_vec()))
}

// =============================================================================
// Tag Tests
// =============================================================================

#[test]
fn test_read_each_tag() {
    let mut r = reader(b"+-:$*");

    assert_eq!(r.read_type().unwrap(), ResponseType::SingleLine);
    assert_eq!(r.read_type().unwrap(), ResponseType::Error);
    assert_eq!(r.read_type().unwrap(), ResponseType::Integer);
    assert_eq!(r.read_type().unwrap(), ResponseType::Bulk);
    assert_eq!(r.read_type().unwrap(), ResponseType::MultiBulk);
}

#[test]
fn test_unknown_tag() {
    let err = reader(b"?what\r\n").read_type().unwrap_err();
    assert!(matches!(err, WireError::UnknownTag(b'?')));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_expect_type_mismatch() {
    let err = reader(b":1\r\n").expect_type(ResponseType::Bulk).unwrap_err();

    match err {
        WireError::UnexpectedResponse { expected, actual } => {
            assert_eq!(expected, ResponseType::Bulk);
            assert_eq!(actual, ResponseType::Integer);
        }
        other => panic!("Expected UnexpectedResponse, got {:?}", other),
    }
}

#[test]
fn test_expect_type_surfaces_error_frame() {
    let err = reader(b"-ERR no such key\r\n")
        .expect_type(ResponseType::SingleLine)
        .unwrap_err();

    match err {
        WireError::Server(message) => assert_eq!(message, "ERR no such key"),
        other => panic!("Expected Server error, got {:?}", other),
    }
}

#[test]
fn test_expect_error_type_leaves_message_unread() {
    let mut r = reader(b"-ERR oops\r\n");
    r.expect_type(ResponseType::Error).unwrap();
    assert_eq!(r.read_line().unwrap(), "ERR oops");
}

#[test]
fn test_empty_stream_is_eof() {
    let err = reader(b"").read_type().unwrap_err();
    assert!(matches!(err, WireError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
}

// =============================================================================
// Line Tests
// =============================================================================

#[test]
fn test_read_line_strips_crlf() {
    let mut r = reader(b"OK\r\nQUEUED\r\n");
    assert_eq!(r.read_status_line().unwrap(), "OK");
    assert_eq!(r.read_status_line().unwrap(), "QUEUED");
}

#[test]
fn test_read_line_accepts_bare_lf() {
    assert_eq!(reader(b"PONG\n").read_line().unwrap(), "PONG");
}

#[test]
fn test_read_line_truncated() {
    let err = reader(b"PON").read_line().unwrap_err();
    assert!(matches!(err, WireError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
}

#[test]
fn test_read_number_lines() {
    let mut r = reader(b"42\r\n-7\r\n9000000000\r\n");
    assert_eq!(r.read_number_line().unwrap(), 42);
    assert_eq!(r.read_number_line().unwrap(), -7);
    assert_eq!(r.read_number_line64().unwrap(), 9_000_000_000);
}

#[test]
fn test_read_number_line_overflow_is_format_error() {
    let err = reader(b"9000000000\r\n").read_number_line().unwrap_err();
    assert!(matches!(err, WireError::Format(_)));
}

#[test]
fn test_read_number_line_garbage_is_format_error() {
    let err = reader(b"12abc\r\n").read_number_line64().unwrap_err();
    assert!(matches!(err, WireError::Format(_)));
}

// =============================================================================
// Bulk Tests
// =============================================================================

#[test]
fn test_read_bulk_body() {
    let mut r = reader(b"$5\r\nhello\r\n");
    r.expect_type(ResponseType::Bulk).unwrap();
    assert_eq!(r.read_bulk_body().unwrap(), Some(b"hello".to_vec()));
}

#[test]
fn test_read_bulk_absent_vs_empty() {
    let mut r = reader(b"$-1\r\n$0\r\n\r\n");

    r.expect_type(ResponseType::Bulk).unwrap();
    assert_eq!(r.read_bulk_body().unwrap(), None);

    r.expect_type(ResponseType::Bulk).unwrap();
    assert_eq!(r.read_bulk_body().unwrap(), Some(Vec::new()));
}

#[test]
fn test_read_bulk_ignores_line_breaks_in_body() {
    let mut r = reader(b"$4\r\na\r\nb\r\n");
    r.expect_type(ResponseType::Bulk).unwrap();
    assert_eq!(r.read_bulk_body().unwrap(), Some(b"a\r\nb".to_vec()));
}

#[test]
fn test_read_bulk_binary_body() {
    let mut r = reader(b"$3\r\n\x00\xff\x10\r\n");
    r.expect_type(ResponseType::Bulk).unwrap();
    assert_eq!(r.read_bulk_body().unwrap(), Some(vec![0x00, 0xff, 0x10]));
}

#[test]
fn test_read_bulk_missing_terminator() {
    let mut r = reader(b"$3\r\nabcX\r\n");
    r.expect_type(ResponseType::Bulk).unwrap();
    assert!(matches!(r.read_bulk_body(), Err(WireError::Protocol(_))));
}

#[test]
fn test_read_bulk_truncated_body() {
    let mut r = reader(b"$5\r\nhel");
    r.expect_type(ResponseType::Bulk).unwrap();
    let err = r.read_bulk_body().unwrap_err();
    assert!(matches!(err, WireError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
}

#[test]
fn test_read_bulk_over_limit() {
    let mut r = FrameReader::with_capacity(64, 4, Cursor::new(b"$5\r\nhello\r\n".to_vec()));
    r.expect_type(ResponseType::Bulk).unwrap();
    assert!(matches!(r.read_bulk_body(), Err(WireError::Protocol(_))));
}

// =============================================================================
// Multi-Bulk Tests
// =============================================================================

#[test]
fn test_read_multi_bulk_with_absent_entries() {
    let mut r = reader(b"*4\r\n$1\r\na\r\n$-1\r\n$0\r\n\r\n$-1\r\n");
    r.expect_type(ResponseType::MultiBulk).unwrap();

    let entries = r.read_multi_bulk_body().unwrap();
    assert_eq!(
        entries,
        vec![Some(b"a".to_vec()), None, Some(Vec::new()), None]
    );
}

#[test]
fn test_read_multi_bulk_empty() {
    let mut r = reader(b"*0\r\n");
    r.expect_type(ResponseType::MultiBulk).unwrap();
    assert!(r.read_multi_bulk_body().unwrap().is_empty());
}

#[test]
fn test_read_multi_bulk_nested_non_bulk() {
    let mut r = reader(b"*2\r\n$1\r\na\r\n:5\r\n");
    r.expect_type(ResponseType::MultiBulk).unwrap();

    let err = r.read_multi_bulk_body().unwrap_err();
    assert!(matches!(
        err,
        WireError::UnexpectedResponse {
            expected: ResponseType::Bulk,
            actual: ResponseType::Integer,
        }
    ));
}

#[test]
fn test_read_multi_bulk_negative_count() {
    let mut r = reader(b"*-1\r\n");
    r.expect_type(ResponseType::MultiBulk).unwrap();
    assert!(matches!(r.read_multi_bulk_body(), Err(WireError::Protocol(_))));
}

#[test]
fn test_read_multi_bulk_truncated() {
    let mut r = reader(b"*3\r\n$1\r\na\r\n");
    r.expect_type(ResponseType::MultiBulk).unwrap();
    assert!(matches!(r.read_multi_bulk_body(), Err(WireError::Io(_))));
}
