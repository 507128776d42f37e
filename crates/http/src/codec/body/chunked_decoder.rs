//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module decodes bodies framed as described in
//! [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112.html#name-chunked-transfer-coding):
//!
//! ```text
//! <hex size>[;extensions]\r\n
//! <size bytes of data>\r\n
//! ...
//! 0\r\n
//! [trailer lines]\r\n
//! \r\n
//! ```
//!
//! Size lines and trailer lines are read through [`LineDecoder`]; the size
//! itself is parsed by `httparse`.

use std::cmp;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::LineDecoder;
use crate::ensure;
use crate::protocol::{ParseError, PayloadItem};
use ChunkedState::*;

/// A decoder for handling HTTP chunked transfer encoding.
///
/// Chunk data is handed out as soon as it arrives, so a large chunk may be
/// returned in several pieces. Chunk extensions and trailer fields are read
/// and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    line_decoder: LineDecoder,
    /// Total number of data bytes handed out so far
    received: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size line
    Size,
    /// Read chunk data, with the number of bytes still missing
    Body { remaining: u64 },
    /// Read the CRLF after chunk data
    BodyCrlf,
    /// Read trailer lines after the last chunk, up to the empty line
    Trailer,
    /// Final state after reading last chunk
    End,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder instance, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self::with_line_decoder(LineDecoder::new())
    }

    pub fn with_line_decoder(line_decoder: LineDecoder) -> Self {
        Self { state: Size, line_decoder, received: 0 }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when chunk data is available
    /// - `Ok(Some(PayloadItem::Eof))` when the final chunk and trailers are processed
    /// - `Ok(None)` when more data is needed
    /// - `Err(ParseError)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                End => {
                    trace!(len = self.received, "finished reading chunked data");
                    return Ok(Some(PayloadItem::Eof));
                }

                Size => {
                    let Some(line) = self.line_decoder.decode_raw(src)? else {
                        return Ok(None);
                    };
                    let size = parse_chunk_size(&line)?;
                    trace!(size, "read chunk size");
                    self.state = if size == 0 { Trailer } else { Body { remaining: size } };
                }

                Body { remaining } => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let read_size = cmp::min(remaining, src.len() as u64);
                    // read_size never exceeds src.len(), so it fits in usize
                    let bytes = src.split_to(read_size as usize).freeze();
                    self.received += read_size;

                    let remaining = remaining - read_size;
                    self.state = if remaining == 0 { BodyCrlf } else { Body { remaining } };

                    trace!(len = bytes.len(), remaining, "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                BodyCrlf => {
                    if src.len() < 2 {
                        ensure!(src.first().is_none_or(|b| *b == b'\r'), ParseError::invalid_chunk("chunk data is not followed by CRLF"));
                        return Ok(None);
                    }
                    ensure!(src[..2] == *b"\r\n", ParseError::invalid_chunk("chunk data is not followed by CRLF"));
                    src.advance(2);
                    self.state = Size;
                }

                Trailer => {
                    let Some(line) = self.line_decoder.decode_raw(src)? else {
                        return Ok(None);
                    };
                    if line.len() == 2 {
                        self.state = End;
                    } else {
                        trace!(len = line.len(), "skip chunked trailer");
                    }
                }
            }
        }
    }

    /// The stream ended.
    ///
    /// A peer closing right after the last chunk, without the final empty
    /// line, still delivered the whole body. Closing anywhere before that
    /// loses data.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }

        match self.state {
            Trailer | End => {
                self.state = End;
                Ok(Some(PayloadItem::Eof))
            }
            // the declared size comes from the peer, so the sum may not fit
            Body { remaining } => Err(ParseError::incomplete_body(self.received.saturating_add(remaining), self.received)),
            Size | BodyCrlf => Err(ParseError::ConnectionClosed),
        }
    }
}

/// Parses a size line, terminator included, into the chunk size.
fn parse_chunk_size(line: &[u8]) -> Result<u64, ParseError> {
    // httparse reads an empty size as 0, which would end the body early
    ensure!(line.first().is_some_and(u8::is_ascii_hexdigit), ParseError::invalid_chunk("chunk size line does not start with a hex digit"));

    match httparse::parse_chunk_size(line) {
        Ok(httparse::Status::Complete((_, size))) => Ok(size),
        Ok(httparse::Status::Partial) => Err(ParseError::invalid_chunk("incomplete chunk size line")),
        Err(httparse::InvalidChunkSize) => Err(ParseError::invalid_chunk("invalid chunk size line")),
    }
}
