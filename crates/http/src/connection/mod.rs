//! HTTP connection handling module
//!
//! This module runs one request/response exchange over a stream the caller
//! already holds, independent of how that stream was opened.
//!
//! # Components
//!
//! - [`HttpConnection`]: writes one request, then reads one whole response,
//!   and is consumed by doing so
//! - [`RequestWriter`]: buffers an encoded request and flushes it in one go

mod http_connection;
mod request_writer;

pub use http_connection::HttpConnection;
pub use request_writer::RequestWriter;
