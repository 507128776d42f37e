//! HTTP response decoder module
//!
//! Decodes one HTTP/1.1 response: the head first through [`HeaderDecoder`],
//! then the body through [`PayloadDecoder`], picked from the head.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use dockwire_http::codec::ResponseDecoder;
//! use dockwire_http::protocol::{Message, PayloadItem};
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK"[..]);
//!
//! let Some(Message::Header((head, _payload_size))) = decoder.decode(&mut buffer).unwrap() else { panic!() };
//! assert_eq!(head.status(), 200);
//!
//! let Some(Message::Payload(PayloadItem::Chunk(bytes))) = decoder.decode(&mut buffer).unwrap() else { panic!() };
//! assert_eq!(&bytes[..], b"OK");
//! ```

use crate::codec::LineDecoder;
use crate::codec::body::PayloadDecoder;
use crate::codec::header::{DEFAULT_MAX_HEADERS, HeaderDecoder};
use crate::codec::DEFAULT_MAX_LINE_LENGTH;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, ResponseHead};
use bytes::BytesMut;
use http::Method;
use tokio_util::codec::Decoder;

/// A decoder for a single HTTP response, head and payload
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None` and not finished: currently parsing the head
/// - `Some(PayloadDecoder)`: currently parsing the payload
/// - finished: the payload EOF has been emitted, nothing more is decoded
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
    line_decoder: LineDecoder,
    finished: bool,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` instance with the default limits
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_LINE_LENGTH, DEFAULT_MAX_HEADERS)
    }

    /// Creates a decoder bounding every line to `max_line_length` bytes and the
    /// head to `max_headers` header lines.
    pub fn with_limits(max_line_length: usize, max_headers: usize) -> Self {
        let line_decoder = LineDecoder::with_max_length(max_line_length);
        Self {
            header_decoder: HeaderDecoder::new(line_decoder.clone(), max_headers),
            payload_decoder: None,
            line_decoder,
            finished: false,
        }
    }

    /// Tells the decoder which request this response answers; responses to
    /// `HEAD` never carry a body.
    #[must_use]
    pub fn with_request_method(mut self, method: &Method) -> Self {
        self.set_request_method(method);
        self
    }

    pub fn set_request_method(&mut self, method: &Method) {
        self.header_decoder.set_head_request(method == Method::HEAD);
    }

    /// Returns true once the end of the payload has been decoded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn payload_message(&mut self, item: Option<PayloadItem>) -> Option<Message<(ResponseHead, PayloadSize)>> {
        match item {
            Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
            Some(item @ PayloadItem::Eof) => {
                // one response per decoder, nothing follows the payload
                self.payload_decoder.take();
                self.finished = true;
                Some(Message::Payload(item))
            }
            None => None,
        }
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<(ResponseHead, PayloadSize)>;
    type Error = ParseError;

    /// Attempts to decode the next piece of the response from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Successfully decoded response head
    /// - `Ok(Some(Message::Payload(_)))`: Successfully decoded a payload chunk or its end
    /// - `Ok(None)`: Need more data to proceed, or the response is finished
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.finished {
            return Ok(None);
        }

        // parse payload if have payload_decoder
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode(src)?;
            return Ok(self.payload_message(item));
        }

        // parse response head
        let message = match self.header_decoder.decode(src)? {
            Some((head, payload_size)) => {
                self.payload_decoder = Some(PayloadDecoder::for_payload(payload_size, self.line_decoder.clone()));
                Some(Message::Header((head, payload_size)))
            }
            None => None,
        };

        Ok(message)
    }

    /// Called once the peer closed its side of the connection.
    ///
    /// # Errors
    ///
    /// - [`ParseError::ConnectionClosed`] if the head is not complete
    /// - [`ParseError::IncompleteBody`] if the body is shorter than declared
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }

        if self.finished {
            return Ok(None);
        }

        match &mut self.payload_decoder {
            Some(payload_decoder) => {
                let item = payload_decoder.decode_eof(src)?;
                Ok(self.payload_message(item))
            }
            None => Err(ParseError::ConnectionClosed),
        }
    }
}
