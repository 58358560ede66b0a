//! Single-use inbound body.
//!
//! An HTTP request body is a stream that can be consumed once. The content
//! kind is decided from headers alone, then [`InboundBody::read`] takes the
//! body by value and commits to exactly one consuming path:
//!
//! ```text
//! Unread ──(multipart/form-data)──▶ ReadBody::Multipart
//!        ──(POST/PUT/PATCH)───────▶ ReadBody::Text | ReadBody::Empty
//!        ──(other methods)────────▶ ReadBody::Empty
//! ```

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{header, HeaderMap, Method, Request},
};
use reqwest::multipart::{Form, Part};

use crate::error::ProxyError;

/// How the inbound body is encoded, judged from `Content-Type` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Multipart,
    None,
}

impl ContentKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            Some(ct) if ct.to_ascii_lowercase().contains("multipart/form-data") => {
                ContentKind::Multipart
            }
            Some(_) => ContentKind::Json,
            None => ContentKind::None,
        }
    }
}

/// Body after its single read.
#[derive(Debug)]
pub enum ReadBody {
    /// Parsed form, re-encoded for the backend.
    Multipart(Form),
    /// Raw bytes, forwarded untouched.
    Text(Bytes),
    /// Nothing to forward.
    Empty,
}

/// Inbound request whose body has not been consumed yet.
pub struct InboundBody {
    kind: ContentKind,
    request: Request<Body>,
    limit: usize,
}

impl InboundBody {
    /// Classify the request without touching its body.
    pub fn new(request: Request<Body>, limit: usize) -> Self {
        let kind = ContentKind::from_headers(request.headers());
        Self {
            kind,
            request,
            limit,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Consume the body through the path matching its content kind.
    pub async fn read(self) -> Result<ReadBody, ProxyError> {
        if self.kind == ContentKind::Multipart {
            let multipart = Multipart::from_request(self.request, &()).await?;
            return read_multipart(multipart).await.map(ReadBody::Multipart);
        }

        if !carries_body(self.request.method()) {
            return Ok(ReadBody::Empty);
        }

        match axum::body::to_bytes(self.request.into_body(), self.limit).await {
            Ok(bytes) if !bytes.is_empty() => Ok(ReadBody::Text(bytes)),
            Ok(_) => Ok(ReadBody::Empty),
            Err(e) => {
                tracing::debug!(error = %e, "Request body unreadable, forwarding without body");
                Ok(ReadBody::Empty)
            }
        }
    }
}

/// Methods whose non-multipart body is forwarded.
fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

async fn read_multipart(mut multipart: Multipart) -> Result<Form, ProxyError> {
    let mut form = Form::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let mut part = Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|source| ProxyError::MultipartField {
                    field: name.clone(),
                    source,
                })?;
        }
        form = form.part(name, part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-GATEWAY-BOUNDARY";

    fn request(method: Method, content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/api/applications");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn multipart_body() -> &'static str {
        concat!(
            "--X-GATEWAY-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"jobId\"\r\n\r\n",
            "42\r\n",
            "--X-GATEWAY-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n",
            "Content-Type: application/pdf\r\n\r\n",
            "%PDF-1.4\r\n",
            "--X-GATEWAY-BOUNDARY--\r\n",
        )
    }

    #[test]
    fn classifies_from_content_type() {
        let mut headers = HeaderMap::new();
        assert_eq!(ContentKind::from_headers(&headers), ContentKind::None);

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(ContentKind::from_headers(&headers), ContentKind::Json);

        headers.insert(
            header::CONTENT_TYPE,
            "Multipart/Form-Data; boundary=X".parse().unwrap(),
        );
        assert_eq!(ContentKind::from_headers(&headers), ContentKind::Multipart);
    }

    #[tokio::test]
    async fn multipart_is_parsed_as_form() {
        let ct = format!("multipart/form-data; boundary={BOUNDARY}");
        let req = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, ct)
            .body(Body::from(multipart_body()))
            .unwrap();

        let body = InboundBody::new(req, 1024 * 1024);
        assert_eq!(body.kind(), ContentKind::Multipart);
        assert!(matches!(body.read().await.unwrap(), ReadBody::Multipart(_)));
    }

    #[tokio::test]
    async fn malformed_multipart_is_an_error() {
        let req = request(
            Method::POST,
            Some("multipart/form-data; boundary=nope"),
            "not a multipart body",
        );
        let err = InboundBody::new(req, 1024).read().await.unwrap_err();
        assert!(matches!(err, ProxyError::Multipart(_)));
    }

    #[tokio::test]
    async fn json_body_is_kept_verbatim() {
        let raw = r#"{"salary": 120000.00, "title":"Engineer"}"#;
        let req = request(Method::POST, Some("application/json"), raw);
        match InboundBody::new(req, 1024).read().await.unwrap() {
            ReadBody::Text(bytes) => assert_eq!(&bytes[..], raw.as_bytes()),
            other => panic!("expected text body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_no_body() {
        let req = request(Method::PUT, None, "");
        assert!(matches!(
            InboundBody::new(req, 1024).read().await.unwrap(),
            ReadBody::Empty
        ));
    }

    #[tokio::test]
    async fn bodies_only_read_for_write_methods() {
        for method in [Method::GET, Method::DELETE] {
            let req = request(method, Some("application/json"), r#"{"ignored":true}"#);
            assert!(matches!(
                InboundBody::new(req, 1024).read().await.unwrap(),
                ReadBody::Empty
            ));
        }
    }

    #[tokio::test]
    async fn oversized_body_is_treated_as_absent() {
        let req = request(Method::PATCH, Some("application/json"), r#"{"too":"long"}"#);
        assert!(matches!(
            InboundBody::new(req, 4).read().await.unwrap(),
            ReadBody::Empty
        ));
    }
}
