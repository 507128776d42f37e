use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error of a single request/response exchange.
///
/// Every variant aborts the exchange: the connection is closed and no partial
/// response is handed to the caller.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("can't connect to {}: {source}", path.display())]
    Connect { path: PathBuf, source: io::Error },

    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: SendError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ParseError,
    },

    #[error("exchange timed out after {0:?}")]
    Timeout(Duration),
}

impl HttpError {
    pub fn connect<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Connect { path: path.into(), source }
    }

    /// Returns true if the peer went away before the response was complete.
    pub fn is_connection_closed(&self) -> bool {
        matches!(
            self,
            HttpError::ResponseError { source: ParseError::ConnectionClosed | ParseError::IncompleteBody { .. } }
        )
    }
}

/// Errors raised while reading and decoding a response.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("connection closed before the response was complete")]
    ConnectionClosed,

    #[error("line exceeds the limit of {max_size} bytes")]
    TooLongLine { max_size: usize },

    #[error("invalid line: {reason}")]
    InvalidLine { reason: String },

    #[error("invalid status line: {line:?}")]
    InvalidStatusLine { line: String },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("response has neither content-length nor chunked transfer-encoding")]
    MissingContentLength,

    #[error("unsupported transfer-encoding: {value}")]
    UnsupportedTransferEncoding { value: String },

    #[error("invalid chunked body: {reason}")]
    InvalidChunk { reason: String },

    #[error("incomplete body, expected {expected} bytes but received {received}")]
    IncompleteBody { expected: u64, received: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_long_line(max_size: usize) -> Self {
        Self::TooLongLine { max_size }
    }

    pub fn invalid_line<S: ToString>(str: S) -> Self {
        Self::InvalidLine { reason: str.to_string() }
    }

    pub fn invalid_status_line<S: ToString>(line: S) -> Self {
        Self::InvalidStatusLine { line: line.to_string() }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn unsupported_transfer_encoding<S: ToString>(value: S) -> Self {
        Self::UnsupportedTransferEncoding { value: value.to_string() }
    }

    pub fn invalid_chunk<S: ToString>(str: S) -> Self {
        Self::InvalidChunk { reason: str.to_string() }
    }

    pub fn incomplete_body(expected: u64, received: u64) -> Self {
        Self::IncompleteBody { expected, received }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Framing violations, as opposed to the peer closing early or I/O failures.
    pub fn is_protocol_error(&self) -> bool {
        !matches!(self, ParseError::ConnectionClosed | ParseError::IncompleteBody { .. } | ParseError::Io { .. })
    }
}

/// Errors raised while building or writing a request.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid request target: {reason}")]
    InvalidTarget { reason: String },

    #[error("invalid query: {source}")]
    InvalidQuery {
        #[from]
        source: serde_urlencoded::ser::Error,
    },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_target<S: ToString>(str: S) -> Self {
        Self::InvalidTarget { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
