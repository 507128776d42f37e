use std::path::{Path, PathBuf};
use std::time::Duration;

use http::HeaderValue;
use thiserror::Error;

use crate::codec::DEFAULT_MAX_LINE_LENGTH;
use crate::codec::header::{DEFAULT_HOST, DEFAULT_MAX_HEADERS};

/// Default capacity of the read buffer of a connection.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Settings shared by every exchange of a [`UnixClient`](crate::client::UnixClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dockwire_http::client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .socket_path("/var/run/docker.sock")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.host(), "docker");
/// assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    socket_path: PathBuf,
    host: HeaderValue,
    timeout: Option<Duration>,
    max_line_length: usize,
    max_headers: usize,
    read_buffer_size: usize,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// A config with every default, talking to `socket_path`.
    pub fn new<P: Into<PathBuf>>(socket_path: P) -> Self {
        Self {
            socket_path: socket_path.into(),
            host: HeaderValue::from_static(DEFAULT_HOST),
            timeout: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_headers: DEFAULT_MAX_HEADERS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn host(&self) -> &HeaderValue {
        &self.host
    }

    /// Deadline of a whole exchange, connect included. `None` waits forever.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn max_headers(&self) -> usize {
        self.max_headers
    }

    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

#[derive(Debug)]
pub struct ClientConfigBuilder {
    socket_path: Option<PathBuf>,
    host: Option<String>,
    timeout: Option<Duration>,
    max_line_length: usize,
    max_headers: usize,
    read_buffer_size: usize,
}

impl ClientConfigBuilder {
    fn new() -> Self {
        Self {
            socket_path: None,
            host: None,
            timeout: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_headers: DEFAULT_MAX_HEADERS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn socket_path<P: Into<PathBuf>>(mut self, socket_path: P) -> Self {
        self.socket_path = Some(socket_path.into());
        self
    }

    /// Value of the `Host` header sent with every request.
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let socket_path = self.socket_path.ok_or(ConfigError::MissingSocketPath)?;
        let host = match self.host {
            Some(host) => HeaderValue::try_from(host.as_str()).map_err(|_invalid| ConfigError::InvalidHost { host })?,
            None => HeaderValue::from_static(DEFAULT_HOST),
        };

        Ok(ClientConfig {
            socket_path,
            host,
            timeout: self.timeout,
            max_line_length: self.max_line_length,
            max_headers: self.max_headers,
            read_buffer_size: self.read_buffer_size,
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("socket path must be set")]
    MissingSocketPath,
    #[error("host {host:?} is not a valid header value")]
    InvalidHost { host: String },
}
