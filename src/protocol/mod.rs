//! Control-Plane Line Protocol
//!
//! A deliberately small framing used by the bundled TCP listener. The
//! dispatcher itself does not depend on it: any transport that can produce a
//! `(name, payload)` pair and carry back a `(status, payload)` pair works.
//!
//! ## Modules
//!
//! - `types`: `RequestFrame` and `ResponseFrame`
//! - `parser`: Request line parsing
//! - `codec`: `RequestCodec`, the `tokio_util` decoder/encoder pair
//!
//! ## Example
//!
//! ```
//! use bytes::BytesMut;
//! use reqdispatch::protocol::{RequestCodec, ResponseFrame};
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut codec = RequestCodec::new();
//! let mut input = BytesMut::from(&b"ping\n"[..]);
//! let frame = codec.decode(&mut input).unwrap().unwrap();
//! assert_eq!(frame.name, "ping");
//!
//! let mut output = BytesMut::new();
//! codec
//!     .encode(ResponseFrame { status: 200, payload: None }, &mut output)
//!     .unwrap();
//! assert_eq!(&output[..], b"200 -1\r\n");
//! ```

pub mod codec;
pub mod parser;
pub mod types;

pub use codec::{FrameError, RequestCodec};
pub use parser::{parse_request_line, ParseError, ParseResult, MAX_LINE_SIZE};
pub use types::{RequestFrame, ResponseFrame};
