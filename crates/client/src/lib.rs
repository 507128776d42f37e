//! Container engine API client over the local unix socket
//!
//! [`Docker`] groups the daemon endpoints by resource. Every call is one
//! HTTP/1.1 exchange on a fresh connection, run by
//! [`dockwire_http::client::UnixClient`]; statuses the endpoint does not
//! document as success come back as [`ApiError`].
//!
//! # Example
//!
//! ```no_run
//! use dockwire::Docker;
//! use dockwire::models::CreateVolume;
//!
//! # async fn run() -> Result<(), dockwire::ApiError> {
//! let docker = Docker::connect_default()?;
//!
//! assert_eq!(docker.system().ping().await?, "OK");
//!
//! let volume = docker.volumes().create(&CreateVolume::named("data")).await?;
//! docker.volumes().remove(&volume.name, false).await?;
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::PathBuf;

use bytes::Bytes;
use dockwire_http::client::{ClientConfig, UnixClient};
use dockwire_http::protocol::FullResponse;
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

mod error;
pub mod models;
mod network;
mod system;
mod volume;

pub use error::ApiError;
pub use network::Networks;
pub use system::System;
pub use volume::Volumes;

/// Socket used when `DOCKER_HOST` is not set.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Entry point to the daemon API. Cheap to clone, clones share the settings.
#[derive(Debug, Clone)]
pub struct Docker {
    client: UnixClient,
}

impl Docker {
    pub fn new<P: Into<PathBuf>>(socket_path: P) -> Self {
        Self { client: UnixClient::new(socket_path) }
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { client: UnixClient::with_config(config) }
    }

    /// Talks to the socket named by `DOCKER_HOST`, or to [`DEFAULT_SOCKET_PATH`].
    ///
    /// # Errors
    ///
    /// [`ApiError::UnsupportedHost`] if `DOCKER_HOST` is not a `unix://` address.
    pub fn connect_default() -> Result<Self, ApiError> {
        let docker_host = env::var("DOCKER_HOST").ok();
        let socket_path = socket_path_from_host(docker_host.as_deref())?;
        debug!(path = %socket_path.display(), "resolved daemon socket");
        Ok(Self::new(socket_path))
    }

    /// The underlying transport, for endpoints without a typed wrapper.
    pub fn client(&self) -> &UnixClient {
        &self.client
    }

    pub fn system(&self) -> System<'_> {
        System::new(&self.client)
    }

    pub fn volumes(&self) -> Volumes<'_> {
        Volumes::new(&self.client)
    }

    pub fn networks(&self) -> Networks<'_> {
        Networks::new(&self.client)
    }
}

/// Resolves a `DOCKER_HOST` value to a socket path.
pub fn socket_path_from_host(docker_host: Option<&str>) -> Result<PathBuf, ApiError> {
    match docker_host.map(str::trim) {
        None | Some("") => Ok(PathBuf::from(DEFAULT_SOCKET_PATH)),
        Some(host) => match host.strip_prefix("unix://") {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Err(ApiError::UnsupportedHost { host: host.to_owned() }),
        },
    }
}

/// Runs one exchange and checks that the daemon answered with `expected`.
async fn call<Q>(
    client: &UnixClient,
    method: Method,
    path: &str,
    query: &Q,
    body: Bytes,
    expected: StatusCode,
) -> Result<FullResponse, ApiError>
where
    Q: Serialize + ?Sized,
{
    let response = client.request(method, path, query, body).await?;
    if response.status() == expected {
        return Ok(response);
    }

    warn!(path, status = response.status().as_u16(), expected = expected.as_u16(), "unexpected status code");
    Err(ApiError::from_response(&response))
}

fn parse_json<T: DeserializeOwned>(response: &FullResponse) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(response.body())?)
}
