use bytes::Bytes;
use dockwire_http::client::UnixClient;
use http::{Method, StatusCode};
use tracing::debug;

use crate::models::{ConnectNetwork, CreateNetwork, DisconnectNetwork, Network, NetworkCreated, NetworkPrune};
use crate::{ApiError, call, parse_json};

/// Network endpoints. `id` accepts a network id or name.
#[derive(Debug, Clone, Copy)]
pub struct Networks<'a> {
    client: &'a UnixClient,
}

impl<'a> Networks<'a> {
    pub(crate) fn new(client: &'a UnixClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Network>, ApiError> {
        let response = call(self.client, Method::GET, "/networks", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    /// # Errors
    ///
    /// [`ApiError::Conflict`] if a network with the same name exists and
    /// duplicates are checked.
    pub async fn create(&self, options: &CreateNetwork) -> Result<NetworkCreated, ApiError> {
        let body = serde_json::to_vec(options)?;
        let response = call(self.client, Method::POST, "/networks/create", &(), Bytes::from(body), StatusCode::CREATED).await?;

        let created: NetworkCreated = parse_json(&response)?;
        debug!(name = %options.name, id = %created.id, "created network");
        Ok(created)
    }

    pub async fn inspect(&self, id: &str) -> Result<Network, ApiError> {
        let response = call(self.client, Method::GET, &format!("/networks/{id}"), &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    /// Predefined networks such as `bridge` can't be removed; the daemon
    /// answers 403, which surfaces as [`ApiError::UnexpectedStatus`].
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        call(self.client, Method::DELETE, &format!("/networks/{id}"), &(), Bytes::new(), StatusCode::NO_CONTENT).await?;
        debug!(id, "removed network");
        Ok(())
    }

    /// Removes every network not used by a container.
    pub async fn prune(&self) -> Result<NetworkPrune, ApiError> {
        let response = call(self.client, Method::POST, "/networks/prune", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    /// Attaches a container to the network.
    pub async fn connect(&self, id: &str, options: &ConnectNetwork) -> Result<(), ApiError> {
        let body = serde_json::to_vec(options)?;
        call(self.client, Method::POST, &format!("/networks/{id}/connect"), &(), Bytes::from(body), StatusCode::OK).await?;
        debug!(id, container = %options.container, "connected container");
        Ok(())
    }

    /// Detaches a container from the network. With `force` the daemon also
    /// detaches a container that is not running.
    pub async fn disconnect(&self, id: &str, container: &str, force: bool) -> Result<(), ApiError> {
        let options = DisconnectNetwork { container: container.to_owned(), force };
        let body = serde_json::to_vec(&options)?;
        call(self.client, Method::POST, &format!("/networks/{id}/disconnect"), &(), Bytes::from(body), StatusCode::OK).await?;
        debug!(id, container, force, "disconnected container");
        Ok(())
    }
}
