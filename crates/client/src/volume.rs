use bytes::Bytes;
use dockwire_http::client::UnixClient;
use http::{Method, StatusCode};
use tracing::debug;

use crate::models::{CreateVolume, Volume, VolumeList, VolumePrune};
use crate::{ApiError, call, parse_json};

/// Volume endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Volumes<'a> {
    client: &'a UnixClient,
}

impl<'a> Volumes<'a> {
    pub(crate) fn new(client: &'a UnixClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<VolumeList, ApiError> {
        let response = call(self.client, Method::GET, "/volumes", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    /// Creates a volume; the daemon generates a name when none is given.
    pub async fn create(&self, options: &CreateVolume) -> Result<Volume, ApiError> {
        let body = serde_json::to_vec(options)?;
        let response = call(self.client, Method::POST, "/volumes/create", &(), Bytes::from(body), StatusCode::CREATED).await?;

        let volume: Volume = parse_json(&response)?;
        debug!(name = %volume.name, "created volume");
        Ok(volume)
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] if no volume is named `name`.
    pub async fn inspect(&self, name: &str) -> Result<Volume, ApiError> {
        let response = call(self.client, Method::GET, &format!("/volumes/{name}"), &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    /// Removes a volume. With `force` the daemon also removes a volume still
    /// referenced by containers.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if no volume is named `name`
    /// - [`ApiError::Conflict`] if the volume is in use
    pub async fn remove(&self, name: &str, force: bool) -> Result<(), ApiError> {
        let query: &[(&str, &str)] = if force { &[("force", "true")] } else { &[] };
        call(self.client, Method::DELETE, &format!("/volumes/{name}"), query, Bytes::new(), StatusCode::NO_CONTENT).await?;
        debug!(name, force, "removed volume");
        Ok(())
    }

    /// Removes every volume not referenced by a container.
    pub async fn prune(&self) -> Result<VolumePrune, ApiError> {
        let response = call(self.client, Method::POST, "/volumes/prune", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }
}
