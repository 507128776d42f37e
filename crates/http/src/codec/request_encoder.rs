//! HTTP request encoder module
//!
//! Serializes a complete [`ClientRequest`], head and buffered body, into the
//! exact bytes sent to the daemon.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use dockwire_http::codec::RequestEncoder;
//! use dockwire_http::protocol::ClientRequest;
//! use http::Method;
//! use tokio_util::codec::Encoder;
//!
//! let request = ClientRequest::new(Method::GET, "/_ping").unwrap();
//! let mut buffer = BytesMut::new();
//! RequestEncoder::default().encode(request, &mut buffer).unwrap();
//!
//! assert_eq!(&buffer[..], b"GET /_ping HTTP/1.1\r\nhost: docker\r\n\r\n");
//! ```

use crate::codec::header::HeaderEncoder;
use crate::protocol::{ClientRequest, PayloadSize, SendError};
use bytes::{BufMut, BytesMut};
use http::HeaderValue;
use tokio_util::codec::Encoder;
use tracing::trace;

/// Encoder for whole requests. Bodies are always sent behind a
/// `Content-Length`, never chunked.
#[derive(Debug, Clone, Default)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    /// Creates an encoder sending `host` as the `Host` header value.
    pub fn new(host: HeaderValue) -> Self {
        Self { header_encoder: HeaderEncoder::new(host) }
    }
}

impl Encoder<ClientRequest> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ClientRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, body) = item.into_parts();

        let payload_size = if body.is_empty() { PayloadSize::Empty } else { PayloadSize::Length(body.len() as u64) };
        trace!(method = %head.method(), target = head.target(), body_size = body.len(), "encode request");

        self.header_encoder.encode((head, payload_size), dst)?;
        dst.put_slice(&body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, header};
    use indoc::indoc;

    fn encode(encoder: &mut RequestEncoder, request: ClientRequest) -> String {
        let mut dst = BytesMut::new();
        encoder.encode(request, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn test_json_body() {
        let request = ClientRequest::new(Method::POST, "/volumes/create").unwrap().body(r#"{"Name":"data"}"#);

        let encoded = encode(&mut RequestEncoder::default(), request);

        let expected = indoc! {r#"
        POST /volumes/create HTTP/1.1
        host: docker
        content-length: 15
        content-type: application/json

        {"Name":"data"}"#};
        assert_eq!(encoded, expected.replace('\n', "\r\n"));
    }

    #[test]
    fn test_query_and_custom_host() {
        let request = ClientRequest::new(Method::DELETE, "/volumes/data")
            .unwrap()
            .query(&[("force", "true")])
            .unwrap()
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));

        let encoded = encode(&mut RequestEncoder::new(HeaderValue::from_static("localhost")), request);

        assert!(encoded.starts_with("DELETE /volumes/data?force=true HTTP/1.1\r\n"));
        assert!(encoded.contains("host: localhost\r\n"));
        assert!(encoded.contains("accept: application/json\r\n"));
        assert!(!encoded.contains("content-length"));
        assert!(encoded.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_encoder_is_reusable() {
        let mut encoder = RequestEncoder::default();
        let mut dst = BytesMut::new();

        encoder.encode(ClientRequest::new(Method::GET, "/_ping").unwrap(), &mut dst).unwrap();
        encoder.encode(ClientRequest::new(Method::GET, "/info").unwrap(), &mut dst).unwrap();

        assert_eq!(&dst[..], b"GET /_ping HTTP/1.1\r\nhost: docker\r\n\r\nGET /info HTTP/1.1\r\nhost: docker\r\n\r\n");
    }
}
