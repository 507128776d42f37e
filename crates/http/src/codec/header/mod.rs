//! HTTP head processing: decoding response heads and encoding request heads.
//!
//! - [`HeaderDecoder`]: reads the status line and header lines of a response
//!   and decides how its body is framed
//! - [`HeaderEncoder`]: writes the request line and header lines of a request,
//!   injecting `Host`, `Content-Length` and `Content-Type`

mod header_decoder;
mod header_encoder;

pub use header_decoder::DEFAULT_MAX_HEADERS;
pub use header_decoder::HeaderDecoder;
pub use header_encoder::DEFAULT_HOST;
pub use header_encoder::HeaderEncoder;
