//! Tenant-aware proxy handler.
//!
//! One linear pass per request:
//! strip mount prefix → keep query → pick headers → read body once →
//! forward → normalize. Any failure along the way becomes a 500 envelope.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;
use crate::http::body::{InboundBody, ReadBody};
use crate::http::request::{request_id, ForwardedHeaders};
use crate::http::response::ProxyResponse;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{OutboundBody, OutboundRequest};

/// Entry point for every `{mount}/*` route.
pub async fn proxy_handler(
    State(state): State<AppState>,
    headers: ForwardedHeaders,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        tenant = ?headers.tenant,
        "Proxying request"
    );

    let response = match handle(&state, headers, request).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = %response.status,
                "Backend responded"
            );
            response.into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, "Proxy failure");
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Forward one inbound request and normalize the backend's answer.
pub async fn handle(
    state: &AppState,
    headers: ForwardedHeaders,
    request: Request<Body>,
) -> Result<ProxyResponse, ProxyError> {
    let method = request.method().clone();
    let path = backend_path(request.uri().path(), &state.mount_prefix).to_string();
    let query = request.uri().query().map(str::to_string);

    let body = match InboundBody::new(request, state.max_body_size).read().await? {
        ReadBody::Multipart(form) => OutboundBody::Multipart(form),
        ReadBody::Text(bytes) => OutboundBody::Json(Some(bytes)),
        ReadBody::Empty => OutboundBody::Json(None),
    };

    let response = state
        .upstream
        .forward(OutboundRequest {
            method,
            path,
            query,
            headers,
            body,
        })
        .await?;

    ProxyResponse::from_upstream(response).await
}

/// Path below the mount prefix, without a leading slash.
pub fn backend_path<'a>(path: &'a str, mount_prefix: &str) -> &'a str {
    path.strip_prefix(mount_prefix)
        .unwrap_or(path)
        .trim_start_matches('/')
}
