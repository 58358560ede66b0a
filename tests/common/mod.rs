//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart},
    http::{header, Request, Response, StatusCode},
    Json, Router,
};
use serde_json::{json, Value};
use tenant_gateway::config::GatewayConfig;
use tenant_gateway::{HttpServer, Shutdown};
use tokio::net::TcpListener;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a backend that describes every request it receives as JSON.
pub async fn start_echo_backend() -> SocketAddr {
    serve(Router::new().fallback(echo)).await
}

/// Start a backend that always answers with the given status, content type
/// and body.
#[allow(dead_code)]
pub async fn start_fixed_backend(
    status: u16,
    content_type: Option<&'static str>,
    body: &'static str,
) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        let mut res = Response::builder()
            .status(StatusCode::from_u16(status).unwrap());
        if let Some(ct) = content_type {
            res = res.header(header::CONTENT_TYPE, ct);
        }
        res.body(Body::from(body)).unwrap()
    });
    serve(app).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the gateway in front of `backend` and return its address.
pub async fn start_gateway(mut config: GatewayConfig, backend: SocketAddr) -> (SocketAddr, Shutdown) {
    config.upstream.base_url = format!("http://{backend}/api/v1");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn echo(request: Request<Body>) -> Json<Value> {
    let headers = request.headers().clone();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = get("content-type");
    let is_multipart = content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let mut fields = Vec::new();
    let mut body = None;
    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let field_type = field.content_type().map(str::to_string);
            let data = field.text().await.unwrap();
            fields.push(json!({
                "name": name,
                "file_name": file_name,
                "content_type": field_type,
                "data": data,
            }));
        }
    } else {
        let bytes = to_bytes(request.into_body(), usize::MAX).await.unwrap();
        if !bytes.is_empty() {
            body = Some(String::from_utf8(bytes.to_vec()).unwrap());
        }
    }

    Json(json!({
        "method": method,
        "path": path,
        "query": query,
        "tenant": get("x-tenant-subdomain"),
        "authorization": get("authorization"),
        "has_authorization": headers.contains_key("authorization"),
        "content_type": content_type,
        "cache_control": get("cache-control"),
        "body": body,
        "fields": fields,
    }))
}
