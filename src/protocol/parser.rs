//! Incremental Request Line Parser
//!
//! The parser reads from a buffer and returns either:
//! - `Ok(Some((frame, consumed)))` - A full line was decoded, `consumed` bytes were used
//! - `Ok(None)` - No newline yet, the line is incomplete
//! - `Err(ParseError)` - The buffered data can never form a valid line
//!
//! [`crate::protocol::RequestCodec`] builds on this to decode lines out of a
//! `Framed` read buffer, keeping any trailing partial line for the next read.

use crate::protocol::types::RequestFrame;
use thiserror::Error;

/// Errors that can occur while parsing request lines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The line is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// The line exceeds the maximum allowed size
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size of one request line, terminator included (64 KB)
pub const MAX_LINE_SIZE: usize = 64 * 1024;

/// Attempts to parse one request line from the front of `buf`.
///
/// # Example
///
/// ```
/// use reqdispatch::protocol::parse_request_line;
///
/// let (frame, consumed) = parse_request_line(b"echo {\"a\":1}\r\nping\n")
///     .unwrap()
///     .unwrap();
/// assert_eq!(frame.name, "echo");
/// assert_eq!(frame.payload.as_deref(), Some("{\"a\":1}"));
/// assert_eq!(consumed, 14);
/// ```
pub fn parse_request_line(buf: &[u8]) -> ParseResult<Option<(RequestFrame, usize)>> {
    let newline = match buf.iter().position(|&b| b == b'\n') {
        Some(pos) => pos,
        None if buf.len() >= MAX_LINE_SIZE => {
            return Err(ParseError::LineTooLong {
                size: buf.len(),
                max: MAX_LINE_SIZE,
            });
        }
        None => return Ok(None),
    };

    let consumed = newline + 1;
    if consumed > MAX_LINE_SIZE {
        return Err(ParseError::LineTooLong {
            size: consumed,
            max: MAX_LINE_SIZE,
        });
    }

    let mut line = &buf[..newline];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }

    let line = std::str::from_utf8(line).map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

    Ok(Some((split_line(line), consumed)))
}

/// Splits a line into request name and payload at the first run of ASCII
/// whitespace.
fn split_line(line: &str) -> RequestFrame {
    let line = line.trim_start();
    match line.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((name, rest)) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
            let payload = if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            };
            RequestFrame::new(name, payload)
        }
        None => RequestFrame::new(line, None),
    }
}
