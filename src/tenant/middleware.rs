//! Host-derived tenant header.
//!
//! Browsers on a tenant hostname normally send `x-tenant-subdomain`
//! themselves. When the gateway is addressed through tenant hostnames
//! directly, this layer fills the header from `Host` instead. An explicit
//! header is never overwritten.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::tenant::{resolve_subdomain, TENANT_HEADER};

/// Insert `x-tenant-subdomain` from the request host when it is missing.
pub async fn derive_tenant_header(mut request: Request<Body>, next: Next) -> Response {
    if !request.headers().contains_key(TENANT_HEADER) {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| request.uri().authority().map(|a| a.as_str()));

        if let Some(tenant) = host.and_then(resolve_subdomain) {
            if let Ok(value) = HeaderValue::from_str(tenant.as_str()) {
                tracing::debug!(tenant = %tenant, "Tenant derived from host");
                request.headers_mut().insert(TENANT_HEADER, value);
            }
        }
    }

    next.run(request).await
}
