//! Tenant-aware API gateway library.
//!
//! Relays browser calls under a mount prefix (`/api/...`) to the backend
//! REST API, carrying the tenant subdomain and bearer token along.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod tenant;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tenant::{resolve_subdomain, TenantSubdomain};
