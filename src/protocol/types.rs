//! Control-Plane Frame Types
//!
//! ## Request Frame
//!
//! One line: the request name, optionally followed by whitespace and a payload.
//!
//! ```text
//! ping\n
//! echo {"hello":"world"}\n
//! ```
//!
//! ## Response Frame
//!
//! A header line with the status code and payload length, then the payload.
//! A length of `-1` means there is no payload.
//!
//! ```text
//! 200 -1\r\n
//! 200 17\r\n{"hello":"world"}\r\n
//! 400 44\r\n{"message":"request name must not be blank"}\r\n
//! ```

use crate::dispatch::Response;
use bytes::{BufMut, BytesMut};

/// The CRLF terminator used in response frames
pub const CRLF: &[u8] = b"\r\n";

/// Length written in the header when there is no payload
pub const NO_PAYLOAD: &[u8] = b"-1";

/// A decoded request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    /// Request name (may be blank; the dispatcher rejects it)
    pub name: String,
    /// Remainder of the line after the name, if any
    pub payload: Option<String>,
}

impl RequestFrame {
    /// Creates a request frame.
    pub fn new(name: impl Into<String>, payload: Option<String>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// A response ready to be written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Numeric status code
    pub status: u16,
    /// Response payload, if any
    pub payload: Option<String>,
}

impl ResponseFrame {
    /// Serializes the frame into an existing buffer.
    pub fn serialize_into(&self, buf: &mut BytesMut) {
        buf.put_slice(self.status.to_string().as_bytes());
        buf.put_u8(b' ');
        match &self.payload {
            Some(payload) => {
                buf.put_slice(payload.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                buf.put_slice(payload.as_bytes());
                buf.put_slice(CRLF);
            }
            None => {
                buf.put_slice(NO_PAYLOAD);
                buf.put_slice(CRLF);
            }
        }
    }
}

impl From<Response> for ResponseFrame {
    fn from(response: Response) -> Self {
        let (status, payload) = response.into_parts();
        Self { status, payload }
    }
}
