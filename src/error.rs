//! Proxy-internal failures.
//!
//! Anything that goes wrong inside the gateway (as opposed to the backend
//! answering with an error status) surfaces as a 500 with the standard
//! `{ success: false, message }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::ProxyResponse;

/// Message used when an error renders to an empty string.
pub const PROXY_FAILED_MESSAGE: &str = "Proxy request failed";

/// Errors raised while handling a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Inbound multipart body could not be parsed.
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Inbound multipart body was rejected before parsing.
    #[error("invalid multipart request: {0}")]
    MultipartRejected(#[from] axum::extract::multipart::MultipartRejection),

    /// A multipart field could not be re-encoded for the backend.
    #[error("invalid multipart field `{field}`: {source}")]
    MultipartField {
        field: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend unreachable or transport failure.
    #[error("backend request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Backend claimed JSON but sent something else.
    #[error("invalid backend response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend URL could not be built.
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
}

impl ProxyError {
    /// Message shown to the caller.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            PROXY_FAILED_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Drop backend URLs carried by transport errors.
    fn without_url(self) -> Self {
        match self {
            Self::Upstream(e) => Self::Upstream(e.without_url()),
            Self::MultipartField { field, source } => Self::MultipartField {
                field,
                source: source.without_url(),
            },
            other => other,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Proxy request failed");
        let message = self.without_url().message();
        ProxyResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
