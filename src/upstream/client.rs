//! Outbound calls to the backend API.
//!
//! # Responsibilities
//! - Own the shared `reqwest::Client` and the configured backend base URL
//! - Rebuild the backend URL from the stripped path and raw query
//! - Attach the tenant and authorization headers
//! - Encode the body as JSON passthrough or multipart form
//!
//! # Design Decisions
//! - Base URL is injected at construction, never read from the environment
//! - No retries: a failed call surfaces to the caller immediately
//! - Multipart requests get no explicit Content-Type; reqwest writes the
//!   boundary itself

use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, HeaderValue, Method},
};
use reqwest::{multipart::Form, Client, Response};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::request::ForwardedHeaders;
use crate::tenant::TENANT_HEADER;

/// Body to send to the backend.
#[derive(Debug)]
pub enum OutboundBody {
    /// JSON text, sent as-is.
    Json(Option<Bytes>),
    /// Multipart form, encoded by the client.
    Multipart(Form),
}

/// A fully resolved call to the backend.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    /// Path below the mount prefix, without a leading slash.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub headers: ForwardedHeaders,
    pub body: OutboundBody,
}

/// HTTP client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client for the configured backend.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_proxy();

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        // Fail early on a malformed base URL.
        Url::parse(&config.base_url)?;

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend URL for a stripped path and raw query.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        let mut target = self.base_url.clone();
        let path = path.trim_start_matches('/');
        if !path.is_empty() {
            target.push('/');
            target.push_str(path);
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Ok(Url::parse(&target)?)
    }

    /// Send the request to the backend and return its raw response.
    pub async fn forward(&self, request: OutboundRequest) -> Result<Response, ProxyError> {
        let url = self.url_for(&request.path, request.query.as_deref())?;

        tracing::debug!(method = %request.method, url = %url, "Forwarding to backend");

        let mut outbound = self
            .client
            .request(request.method, url)
            .header(TENANT_HEADER, request.headers.tenant_value());

        if let Some(auth) = request.headers.authorization {
            outbound = outbound.header(header::AUTHORIZATION, auth);
        }

        outbound = match request.body {
            OutboundBody::Multipart(form) => outbound.multipart(form),
            OutboundBody::Json(body) => {
                let outbound = outbound
                    .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
                match body {
                    Some(bytes) => outbound.body(bytes),
                    None => outbound,
                }
            }
        };

        Ok(outbound.send().await?)
    }
}
