//! HTTP response head decoder
//!
//! Decodes the status line and the header section of a response, one line at a
//! time through [`LineDecoder`], and selects how the body that follows is
//! framed.
//!
//! # Parsing rules
//!
//! - The status line is split on whitespace; the second token must be a
//!   three digit status code
//! - Each header line is split on its first `:`, and both sides are trimmed;
//!   values are kept as bytes, so obs-text is accepted
//! - Header names are case-insensitive, a repeated name keeps its last value
//! - The empty line ends the head
//!
//! # Limits
//!
//! - Maximum line length: 8KB by default
//! - Maximum number of headers: 100 by default

use bytes::BytesMut;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::codec::LineDecoder;
use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, ResponseHead};

/// Default maximum number of header lines in a response
pub const DEFAULT_MAX_HEADERS: usize = 100;

/// Decoder for HTTP response heads implementing the [`Decoder`] trait.
///
/// Produces the [`ResponseHead`] together with the [`PayloadSize`] describing
/// the body. Bytes after the blank line are left untouched in the buffer.
#[derive(Debug)]
pub struct HeaderDecoder {
    line_decoder: LineDecoder,
    state: HeadState,
    max_headers: usize,
    head_request: bool,
}

#[derive(Debug)]
enum HeadState {
    /// Waiting for the status line
    StatusLine,
    /// Reading header lines until the blank line
    Headers { status: StatusCode, headers: HeaderMap, lines: usize },
}

impl HeaderDecoder {
    pub fn new(line_decoder: LineDecoder, max_headers: usize) -> Self {
        Self { line_decoder, state: HeadState::StatusLine, max_headers, head_request: false }
    }

    /// Marks the response as the answer to a `HEAD` request, which never has a body.
    pub fn set_head_request(&mut self, head_request: bool) {
        self.head_request = head_request;
    }

    /// Returns true once the status line has been consumed.
    pub fn is_reading_headers(&self) -> bool {
        matches!(self.state, HeadState::Headers { .. })
    }
}

impl Default for HeaderDecoder {
    fn default() -> Self {
        Self::new(LineDecoder::new(), DEFAULT_MAX_HEADERS)
    }
}

impl Decoder for HeaderDecoder {
    type Item = (ResponseHead, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a response head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` once the blank line has been read
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the status line or a header line is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(mut line) = self.line_decoder.decode_raw(src)? else {
                return Ok(None);
            };
            line.truncate(line.len() - 2);

            match &mut self.state {
                HeadState::StatusLine => {
                    let line = std::str::from_utf8(&line).map_err(|_e| ParseError::invalid_status_line(String::from_utf8_lossy(&line)))?;
                    let status = parse_status_line(line)?;
                    trace!(status = status.as_u16(), "parsed status line");
                    self.state = HeadState::Headers { status, headers: HeaderMap::new(), lines: 0 };
                }

                HeadState::Headers { headers, lines, .. } if !line.is_empty() => {
                    // repeated names replace each other, so count lines rather than map entries
                    ensure!(*lines < self.max_headers, ParseError::too_many_headers(self.max_headers));
                    *lines += 1;
                    let (name, value) = parse_header_line(&line)?;
                    headers.insert(name, value);
                }

                HeadState::Headers { status, headers, .. } => {
                    let mut head = Response::new(());
                    *head.status_mut() = *status;
                    *head.headers_mut() = std::mem::take(headers);
                    self.state = HeadState::StatusLine;

                    let payload_size = parse_payload(&head, self.head_request)?;
                    trace!(status = head.status().as_u16(), headers = head.headers().len(), ?payload_size, "parsed response head");
                    return Ok(Some((head, payload_size)));
                }
            }
        }
    }
}

/// Parses `HTTP/1.1 404 Not Found` into its status code.
///
/// The line is split on runs of whitespace; the first token must name an HTTP
/// version and the second must be a three digit code. The reason phrase is
/// optional and ignored.
pub(crate) fn parse_status_line(line: &str) -> Result<StatusCode, ParseError> {
    let mut tokens = line.split_ascii_whitespace();

    let version = tokens.next().ok_or_else(|| ParseError::invalid_status_line(line))?;
    ensure!(version.starts_with("HTTP/"), ParseError::invalid_status_line(line));

    let code = tokens.next().ok_or_else(|| ParseError::invalid_status_line(line))?;
    StatusCode::from_bytes(code.as_bytes()).map_err(|_e| ParseError::invalid_status_line(line))
}

/// Splits a header line on its first `:` and trims both sides.
///
/// Works on raw bytes: values may carry obs-text (bytes above 0x7f), which
/// `HeaderValue` keeps as is.
pub(crate) fn parse_header_line(line: &[u8]) -> Result<(HeaderName, HeaderValue), ParseError> {
    // obsolete line folding is rejected rather than merged into the previous header
    ensure!(
        !matches!(line.first(), Some(b' ' | b'\t')),
        ParseError::invalid_header(format!("folded header line {:?}", String::from_utf8_lossy(line)))
    );

    let colon = line
        .iter()
        .position(|b| *b == b':')
        .ok_or_else(|| ParseError::invalid_header(format!("missing ':' in {:?}", String::from_utf8_lossy(line))))?;
    let (name, value) = (&line[..colon], &line[colon + 1..]);

    let name = HeaderName::from_bytes(name.trim_ascii())
        .map_err(|_e| ParseError::invalid_header(format!("invalid header name {:?}", String::from_utf8_lossy(name))))?;
    let value =
        HeaderValue::from_bytes(value.trim_ascii()).map_err(|_e| ParseError::invalid_header(format!("invalid value of header {name}")))?;

    Ok((name, value))
}

/// Determines how the body of a response is framed.
///
/// # Returns
///
/// - Empty for `1xx`, `204`, `304` and responses to `HEAD`, whatever the headers say
/// - Chunked if the final transfer coding is `chunked`
/// - Fixed length if Content-Length is present
///
/// # Errors
///
/// - A transfer coding other than chunked
/// - A missing or non-numeric Content-Length outside chunked mode
fn parse_payload(head: &ResponseHead, head_request: bool) -> Result<PayloadSize, ParseError> {
    let status = head.status();
    if head_request || status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
        return Ok(PayloadSize::new_empty());
    }

    // refer: https://www.rfc-editor.org/rfc/rfc9112.html#name-message-body-length
    if let Some(te_value) = head.headers().get(http::header::TRANSFER_ENCODING) {
        if is_chunked(te_value) {
            if head.headers().contains_key(http::header::CONTENT_LENGTH) {
                warn!("both transfer-encoding and content-length present, ignoring content-length");
            }
            return Ok(PayloadSize::new_chunked());
        }

        let value = String::from_utf8_lossy(te_value.as_bytes());
        return Err(ParseError::unsupported_transfer_encoding(value));
    }

    let cl_value = head.headers().get(http::header::CONTENT_LENGTH).ok_or(ParseError::MissingContentLength)?;
    let cl_str = cl_value.to_str().map_err(|_e| ParseError::invalid_content_length("value can't to_str"))?;

    // u64::from_str accepts a leading '+', which is not a valid content length
    ensure!(
        !cl_str.is_empty() && cl_str.bytes().all(|b| b.is_ascii_digit()),
        ParseError::invalid_content_length(format!("value {cl_str} is not u64"))
    );
    let length = cl_str.parse::<u64>().map_err(|_e| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

    Ok(PayloadSize::new_length(length))
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// Chunked must be the last coding if present. The comparison is
/// case-insensitive.
fn is_chunked(header_value: &HeaderValue) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    header_value
        .as_bytes()
        .rsplit(|b| *b == b',')
        .next()
        .is_some_and(|bytes| bytes.trim_ascii().eq_ignore_ascii_case(CHUNKED))
}
