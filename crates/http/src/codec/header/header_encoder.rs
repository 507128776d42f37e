//! HTTP request head encoder
//!
//! Serializes the request line and header section of a request:
//!
//! ```text
//! <METHOD> <path>[?<query>] HTTP/1.1\r\n
//! <name>: <value>\r\n
//! ...
//! \r\n
//! ```
//!
//! `Host` is always set. A request with a non-empty body additionally gets
//! `Content-Length` and `Content-Type: application/json`, since every body the
//! daemon accepts is JSON. Framing headers supplied by the caller are dropped:
//! the body decides `Content-Length`, and `Transfer-Encoding` is never sent.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::{HeaderValue, header};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{PayloadSize, RequestHead, SendError};

/// Host header sent when none is configured. The socket has no host name, the
/// daemon only needs the header to be present.
pub const DEFAULT_HOST: &str = "docker";

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Encoder for HTTP request heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone)]
pub struct HeaderEncoder {
    host: HeaderValue,
}

impl HeaderEncoder {
    pub fn new(host: HeaderValue) -> Self {
        Self { host }
    }
}

impl Default for HeaderEncoder {
    fn default() -> Self {
        Self::new(HeaderValue::from_static(DEFAULT_HOST))
    }
}

impl Encoder<(RequestHead, PayloadSize)> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the request head into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is chunked: request bodies are always
    /// buffered, so their length is known up front.
    fn encode(&mut self, item: (RequestHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut head, payload_size) = item;

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", head.method(), head.target())?;

        let headers = head.headers_mut();
        headers.insert(header::HOST, self.host.clone());
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);

        match payload_size {
            PayloadSize::Length(n) if n > 0 => {
                headers.insert(header::CONTENT_LENGTH, n.into());
                headers.insert(header::CONTENT_TYPE, APPLICATION_JSON);
            }
            PayloadSize::Length(_) | PayloadSize::Empty => {
                headers.remove(header::CONTENT_TYPE);
            }
            PayloadSize::Chunked => {
                error!("chunked request body is not supported");
                return Err(SendError::invalid_body("chunked request body is not supported"));
            }
        }

        for (header_name, header_value) in head.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// `io::Write` adapter appending to a `BytesMut`, used for the formatted request line.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
