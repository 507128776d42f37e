use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use tokio::net::UnixStream;
use tracing::{debug, error, warn};

use crate::client::ClientConfig;
use crate::connection::HttpConnection;
use crate::protocol::{ClientRequest, FullResponse, HttpError};

/// Client of an HTTP/1.1 daemon listening on a unix domain socket.
///
/// Every exchange opens its own connection and closes it once the response
/// is read, so a client holds no connection state: clones are cheap and may
/// run exchanges concurrently.
///
/// # Example
///
/// ```no_run
/// use dockwire_http::client::UnixClient;
/// use http::Method;
///
/// # async fn run() -> Result<(), dockwire_http::protocol::HttpError> {
/// let client = UnixClient::new("/var/run/docker.sock");
/// let response = client.request(Method::GET, "/_ping", &(), "").await?;
/// assert_eq!(&response.body()[..], b"OK");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UnixClient {
    config: Arc<ClientConfig>,
}

impl UnixClient {
    /// A client with default settings, talking to `socket_path`.
    pub fn new<P: Into<PathBuf>>(socket_path: P) -> Self {
        Self::with_config(ClientConfig::new(socket_path))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config: Arc::new(config) }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs one exchange. `query` is url-encoded into the request target,
    /// pass `&()` for none. A non-empty `body` is sent as JSON.
    ///
    /// Any status code is a successful exchange; mapping statuses to errors is
    /// left to the caller.
    pub async fn request<Q, B>(&self, method: Method, path: &str, query: &Q, body: B) -> Result<FullResponse, HttpError>
    where
        Q: Serialize + ?Sized,
        B: Into<Bytes>,
    {
        let request = ClientRequest::new(method, path)?.query(query)?.body(body);
        self.send(request).await
    }

    /// Runs one exchange for a prebuilt request, e.g. one carrying extra headers.
    ///
    /// # Errors
    ///
    /// [`HttpError::Timeout`] once the configured deadline passes; the
    /// connection is dropped together with the unfinished exchange.
    pub async fn send(&self, request: ClientRequest) -> Result<FullResponse, HttpError> {
        match self.config.timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, self.exchange(request)).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    warn!(timeout = ?timeout, "exchange timed out, connection dropped");
                    Err(HttpError::Timeout(timeout))
                }
            },
            None => self.exchange(request).await,
        }
    }

    async fn exchange(&self, request: ClientRequest) -> Result<FullResponse, HttpError> {
        let path = self.config.socket_path();
        let stream = match UnixStream::connect(path).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(path = %path.display(), cause = %e, "can't connect to socket");
                return Err(HttpError::connect(path, e));
            }
        };
        debug!(path = %path.display(), "connected");

        let (reader, writer) = stream.into_split();
        HttpConnection::with_config(reader, writer, &self.config).send(request).await
    }
}
