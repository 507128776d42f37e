use dockwire_http::protocol::{FullResponse, HttpError};
use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors of a daemon API call.
///
/// The exchange itself may fail ([`ApiError::Transport`]), or it may succeed
/// with a status code the endpoint does not document as success.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("daemon error: {message}")]
    Server { message: String },

    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("unsupported docker host {host:?}, only unix:// sockets are supported")]
    UnsupportedHost { host: String },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: HttpError,
    },

    #[error("invalid json payload: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Error body sent by the daemon with every non-2xx status.
#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl ApiError {
    /// Maps a response whose status is not the expected one.
    pub fn from_response(response: &FullResponse) -> Self {
        let body = String::from_utf8_lossy(response.body()).into_owned();
        let message = || serde_json::from_str::<ErrorMessage>(&body).map_or_else(|_e| body.trim().to_owned(), |e| e.message);

        match response.status() {
            StatusCode::NOT_FOUND => Self::NotFound { message: message() },
            StatusCode::CONFLICT => Self::Conflict { message: message() },
            StatusCode::INTERNAL_SERVER_ERROR => Self::Server { message: message() },
            status => Self::UnexpectedStatus { status, body },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
