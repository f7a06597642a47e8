//! `tokio_util` codec for the control-plane line protocol.
//!
//! [`RequestCodec`] decodes [`RequestFrame`]s from a byte stream and encodes
//! [`ResponseFrame`]s back onto it, so a connection can be wrapped in
//! `Framed<S, RequestCodec>` and driven as a stream of requests plus a sink
//! of responses.

use super::parser::{parse_request_line, ParseError};
use super::types::{RequestFrame, ResponseFrame};
use bytes::{Buf, BytesMut};
use std::io;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Errors surfaced while reading or writing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer sent bytes that can never form a request line.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The underlying stream failed, or closed mid-line.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FrameError {
    /// True when the peer went away without an orderly shutdown.
    pub fn is_disconnect(&self) -> bool {
        match self {
            FrameError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            FrameError::Parse(_) => false,
        }
    }
}

/// Line codec: `NAME[ PAYLOAD]\n` in, `STATUS LEN\r\n[PAYLOAD\r\n]` out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCodec;

impl RequestCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RequestCodec {
    type Item = RequestFrame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<RequestFrame>, FrameError> {
        match parse_request_line(src)? {
            Some((frame, consumed)) => {
                src.advance(consumed);
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }
}

impl Encoder<ResponseFrame> for RequestCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: ResponseFrame, dst: &mut BytesMut) -> Result<(), FrameError> {
        frame.serialize_into(dst);
        Ok(())
    }
}
