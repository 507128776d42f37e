//! Decoder for CRLF terminated lines.
//!
//! The status line, every header line, chunk size lines, the CRLF after chunk
//! data and trailer lines all go through this decoder. A line ends at the first
//! `\n`, which must be preceded by `\r`; the returned line never contains the
//! terminator.
//!
//! The [`Decoder`] impl yields text and rejects lines that are not UTF-8. The
//! response decoders work on the raw lines instead, so header values carrying
//! obs-text bytes still parse.

use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// Default upper bound of a single line, terminator excluded.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Splits CRLF terminated lines off the front of a buffer.
///
/// The decoder remembers how far it already searched, so feeding a long line
/// in small pieces does not rescan the buffer from the start each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDecoder {
    max_length: usize,
    next_index: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Creates a decoder rejecting lines longer than `max_length` bytes.
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length, next_index: 0 }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Splits the next complete line off `src`, terminator included.
    ///
    /// # Returns
    /// - `Ok(Some(line))` with the trailing `\r\n` still attached
    /// - `Ok(None)` when no `\n` has arrived yet
    /// - `Err(ParseError)` on a bare `\n` or a line over the limit
    pub(crate) fn decode_raw(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, ParseError> {
        let limit = self.max_length.saturating_add(2);
        let read_to = cmp::min(limit, src.len());
        let start = cmp::min(self.next_index, read_to);

        match src[start..read_to].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = start + offset + 1;
                self.next_index = 0;

                let line = src.split_to(end);
                ensure!(line.len() >= 2 && line[line.len() - 2] == b'\r', ParseError::invalid_line("line is not terminated by CRLF"));

                trace!(len = line.len(), "read line");
                Ok(Some(line))
            }

            None => {
                ensure!(src.len() < limit, ParseError::too_long_line(self.max_length));
                self.next_index = read_to;
                Ok(None)
            }
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineDecoder {
    type Item = String;
    type Error = ParseError;

    /// Returns the next line as text with its `\r\n` stripped.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(mut line) = self.decode_raw(src)? else {
            return Ok(None);
        };

        line.truncate(line.len() - 2);
        let text = String::from_utf8(line.to_vec()).map_err(|_e| ParseError::invalid_line("line is not valid utf-8"))?;
        Ok(Some(text))
    }
}
