//! Inbound request metadata.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Extract the headers the backend cares about (tenant, authorization)
//!
//! # Design Decisions
//! - Request ID added as early as possible and echoed on the response
//! - Only the tenant and authorization headers are forwarded; everything
//!   else (cookies, content-length, hop-by-hop) stays at the gateway

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Request},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::tenant::TENANT_HEADER;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-ID layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Headers relayed from the caller to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedHeaders {
    /// `x-tenant-subdomain`, as sent by the caller.
    pub tenant: Option<HeaderValue>,
    /// `authorization`, as sent by the caller.
    pub authorization: Option<HeaderValue>,
}

impl ForwardedHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            tenant: headers.get(TENANT_HEADER).cloned(),
            authorization: headers.get(header::AUTHORIZATION).cloned(),
        }
    }

    /// Tenant header value for the backend; empty when the caller sent none.
    pub fn tenant_value(&self) -> HeaderValue {
        self.tenant
            .clone()
            .unwrap_or_else(|| HeaderValue::from_static(""))
    }
}

impl<S> FromRequestParts<S> for ForwardedHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
