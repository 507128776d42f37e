//! HTTP codec module for encoding requests and decoding responses
//!
//! This module turns a [`ClientRequest`](crate::protocol::ClientRequest) into
//! bytes and turns bytes read from the socket back into a response head plus a
//! stream of payload items. Decoding is a state machine that never needs the
//! whole response in memory before making progress.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestEncoder`]: Encodes a whole request, head and body
//!   - Head encoding via [`header::HeaderEncoder`]
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: Decodes the head, then the payload
//!   - Line splitting via [`LineDecoder`]
//!   - Head parsing via [`header::HeaderDecoder`]
//!   - Payload decoding via [`body::PayloadDecoder`]
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use dockwire_http::codec::{RequestEncoder, ResponseDecoder};
//! use dockwire_http::protocol::ClientRequest;
//! use http::Method;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! // Encode outgoing request
//! let mut encoder = RequestEncoder::default();
//! let mut request_buffer = BytesMut::new();
//! encoder.encode(ClientRequest::new(Method::GET, "/_ping").unwrap(), &mut request_buffer).unwrap();
//!
//! // Decode incoming response
//! let mut decoder = ResponseDecoder::new();
//! let mut response_buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK"[..]);
//! let head = decoder.decode(&mut response_buffer).unwrap();
//! assert!(head.is_some());
//! ```

pub mod body;
pub mod header;
mod line_decoder;
mod request_encoder;
mod response_decoder;

pub use line_decoder::DEFAULT_MAX_LINE_LENGTH;
pub use line_decoder::LineDecoder;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
