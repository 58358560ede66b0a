//! Tenant identification.
//!
//! # Data Flow
//! ```text
//! Host header ("acme.example.com:443")
//!     → subdomain.rs (pure resolution → Option<TenantSubdomain>)
//!     → middleware.rs (optional: fill x-tenant-subdomain when absent)
//!     → proxy forwards x-tenant-subdomain to the backend
//! ```

pub mod middleware;
pub mod subdomain;

pub use subdomain::{resolve_subdomain, TenantSubdomain};

/// Header carrying the tenant subdomain to the backend.
pub const TENANT_HEADER: &str = "x-tenant-subdomain";
