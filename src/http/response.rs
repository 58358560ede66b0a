//! Backend response normalization.
//!
//! # Responsibilities
//! - Mirror the backend status code to the caller
//! - Relay JSON bodies verbatim
//! - Wrap non-JSON bodies in the `{ success, data | message }` envelope
//!
//! # Design Decisions
//! - The backend body is read exactly once, as bytes, then interpreted
//! - JSON is validated but relayed as the original bytes (no number drift)
//! - Responses are fully buffered; the gateway never streams
//! - A body that claims JSON but fails to parse is a proxy-internal error

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::IgnoredAny;
use serde_json::{json, Value};

use crate::error::ProxyError;

/// Message used when a failing backend sends an empty, non-JSON body.
pub const BACKEND_FAILED_MESSAGE: &str = "Backend request failed";

/// Body relayed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyBody {
    /// Backend JSON, already validated, passed through untouched.
    Json(Bytes),
    /// Envelope built by the gateway around a non-JSON body.
    Envelope(Value),
}

/// Normalized response relayed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: ProxyBody,
}

impl ProxyResponse {
    /// `{ success: false, message }` with the given status.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ProxyBody::Envelope(json!({ "success": false, "message": message.into() })),
        }
    }

    /// `{ success: true, data }` with the given status.
    pub fn wrapped(status: StatusCode, data: impl Into<String>) -> Self {
        Self {
            status,
            body: ProxyBody::Envelope(json!({ "success": true, "data": data.into() })),
        }
    }

    /// Build the caller-facing response from the backend's reply.
    pub async fn from_upstream(response: reqwest::Response) -> Result<Self, ProxyError> {
        let status = response.status();
        let is_json = is_json_content(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            if serde_json::from_slice::<IgnoredAny>(&bytes).is_ok() {
                return Ok(Self {
                    status,
                    body: ProxyBody::Json(bytes),
                });
            }
            let text = String::from_utf8_lossy(&bytes);
            let message = if text.is_empty() {
                BACKEND_FAILED_MESSAGE.to_string()
            } else {
                text.into_owned()
            };
            return Ok(Self::failure(status, message));
        }

        if is_json {
            serde_json::from_slice::<IgnoredAny>(&bytes)?;
            Ok(Self {
                status,
                body: ProxyBody::Json(bytes),
            })
        } else {
            Ok(Self::wrapped(status, String::from_utf8_lossy(&bytes)))
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        match self.body {
            ProxyBody::Json(bytes) => (
                self.status,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                bytes,
            )
                .into_response(),
            ProxyBody::Envelope(value) => (self.status, Json(value)).into_response(),
        }
    }
}

/// True when the `Content-Type` names a JSON media type.
fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}
