//! An asynchronous HTTP/1.1 client over unix domain sockets
//!
//! This crate speaks just enough HTTP/1.1 to drive a container engine daemon
//! through its local socket: it writes a request, reads exactly one response
//! and closes the connection. It is built on top of tokio and
//! `tokio_util::codec`, so the wire codecs can also be reused on any stream.
//!
//! # Features
//!
//! - Request serialization with automatic `Host`, `Content-Length` and
//!   `Content-Type: application/json` headers
//! - Response parsing with fixed-length and chunked bodies
//! - Bounded line length and header count
//! - One connection per exchange, with an optional deadline
//!
//! # Example
//!
//! ```no_run
//! use dockwire_http::client::{ClientConfig, UnixClient};
//! use http::Method;
//! use std::time::Duration;
//! use tracing::{Level, info};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::DEBUG)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let config = ClientConfig::builder()
//!         .socket_path("/var/run/docker.sock")
//!         .timeout(Duration::from_secs(10))
//!         .build()
//!         .expect("invalid client config");
//!     let client = UnixClient::with_config(config);
//!
//!     match client.request(Method::GET, "/version", &(), "").await {
//!         Ok(response) => {
//!             let body = String::from_utf8_lossy(response.body());
//!             info!(status = response.status().as_u16(), %body, "daemon version");
//!         }
//!         Err(e) => eprintln!("exchange failed: {e}"),
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`client`]: Socket addressing, configuration and the exchange deadline
//! - [`connection`]: One request/response exchange over an open stream
//! - [`protocol`]: Protocol types and errors
//! - [`codec`]: Protocol encoding/decoding implementation
//!
//! ## Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Response parsing errors
//! - [`protocol::SendError`]: Request building and sending errors
//!
//! No partial response is ever returned: an exchange either yields the whole
//! response or an error.
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no connection reuse
//! - Request bodies are fully buffered, never streamed
//! - No upgraded or hijacked connections
//! - Maximum line length: 8KB by default
//! - Maximum number of headers: 100 by default

pub mod client;
pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
