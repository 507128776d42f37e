//! HTTP response type definitions.
//!
//! Both aliases reuse `http::Response`: the head is decoded first with an empty
//! body placeholder, and the full response carries the materialized body.

use bytes::Bytes;
use http::Response;

/// Status code and headers of a response, before its body has been read.
pub type ResponseHead = Response<()>;

/// A fully read response. The body is never partially populated.
pub type FullResponse = Response<Bytes>;
