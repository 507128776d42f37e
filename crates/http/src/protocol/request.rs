//! Client request representation.
//!
//! A [`ClientRequest`] is built fresh for every exchange, consumed once by the
//! request encoder, and then dropped. The query string is url-encoded at build
//! time so that encoding problems surface before any socket is opened.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

use crate::ensure;
use crate::protocol::SendError;

/// Everything of a request except its body.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
}

impl RequestHead {
    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path, never containing a query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the url-encoded query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The request target as written on the request line: `<path>[?<query>]`.
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// A request to send over a fresh connection.
///
/// # Example
///
/// ```
/// use dockwire_http::protocol::ClientRequest;
/// use http::Method;
///
/// let request = ClientRequest::new(Method::DELETE, "/volumes/data")
///     .unwrap()
///     .query(&[("force", "true")])
///     .unwrap();
///
/// assert_eq!(request.head().target(), "/volumes/data?force=true");
/// assert!(request.body_bytes().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ClientRequest {
    head: RequestHead,
    body: Bytes,
}

impl ClientRequest {
    /// Creates a request with no query, no headers and an empty body.
    ///
    /// # Errors
    ///
    /// The path must start with `/` and contain only visible ASCII, with no
    /// `?` or `#`; queries go through [`ClientRequest::query`].
    pub fn new<P: Into<String>>(method: Method, path: P) -> Result<Self, SendError> {
        let path = path.into();
        ensure!(path.starts_with('/'), SendError::invalid_target(format!("path {path:?} must start with '/'")));
        ensure!(
            path.bytes().all(|b| b.is_ascii_graphic() && b != b'?' && b != b'#'),
            SendError::invalid_target(format!("path {path:?} contains characters not allowed in a path"))
        );

        Ok(Self { head: RequestHead { method, path, query: None, headers: HeaderMap::new() }, body: Bytes::new() })
    }

    /// Url-encodes `query` into the query string, replacing any previous one.
    ///
    /// Anything `serde_urlencoded` accepts works: a slice of pairs, a map or a
    /// struct with named fields.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self, SendError> {
        let encoded = serde_urlencoded::to_string(query)?;
        self.head.query = if encoded.is_empty() { None } else { Some(encoded) };
        Ok(self)
    }

    /// Sets a header, replacing any previous value of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.head.headers.insert(name, value);
        self
    }

    pub fn body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestHead, Bytes) {
        (self.head, self.body)
    }
}
