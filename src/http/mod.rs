//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, method filter)
//!     → request.rs (request ID, forwarded headers)
//!     → proxy.rs (strip mount prefix, dispatch)
//!     → body.rs (classify, read body exactly once)
//!     → upstream client (backend call)
//!     → response.rs (mirror status, normalize body)
//!     → Send to client
//! ```

pub mod body;
pub mod health;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ForwardedHeaders, X_REQUEST_ID};
pub use response::{ProxyBody, ProxyResponse};
pub use server::{AppState, HttpServer};
