use bytes::Bytes;
use dockwire_http::client::UnixClient;
use http::{Method, StatusCode};

use crate::models::{SystemInfo, Version};
use crate::{ApiError, call, parse_json};

/// System endpoints: liveness, version and daemon information.
#[derive(Debug, Clone, Copy)]
pub struct System<'a> {
    client: &'a UnixClient,
}

impl<'a> System<'a> {
    pub(crate) fn new(client: &'a UnixClient) -> Self {
        Self { client }
    }

    /// `GET /_ping`, returns the body the daemon answers with, `OK`.
    pub async fn ping(&self) -> Result<String, ApiError> {
        let response = call(self.client, Method::GET, "/_ping", &(), Bytes::new(), StatusCode::OK).await?;
        Ok(String::from_utf8_lossy(response.body()).trim().to_owned())
    }

    /// `HEAD /_ping`, a liveness check without a body.
    pub async fn ping_head(&self) -> Result<(), ApiError> {
        call(self.client, Method::HEAD, "/_ping", &(), Bytes::new(), StatusCode::OK).await?;
        Ok(())
    }

    pub async fn version(&self) -> Result<Version, ApiError> {
        let response = call(self.client, Method::GET, "/version", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }

    pub async fn info(&self) -> Result<SystemInfo, ApiError> {
        let response = call(self.client, Method::GET, "/info", &(), Bytes::new(), StatusCode::OK).await?;
        parse_json(&response)
    }
}
