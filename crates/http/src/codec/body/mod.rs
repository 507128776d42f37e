//! HTTP body decoding for responses
//!
//! ## Decoders
//! - `ChunkedDecoder`: Handles chunked transfer encoded payloads
//! - `LengthDecoder`: Processes fixed-length payloads
//! - [`PayloadDecoder`]: Main decoder that coordinates different decoding strategies
//!
//! Request bodies need no decoder counterpart: they are always fully buffered
//! and written behind a `Content-Length` header by the request encoder.

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
