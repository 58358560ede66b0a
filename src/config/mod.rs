//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → BACKEND_URL environment override
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is resolved once per process; there is no runtime mutation path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, BACKEND_URL_ENV};
pub use schema::{
    GatewayConfig, ListenerConfig, ObservabilityConfig, ProxySettings, SecurityConfig,
    TenantConfig, UpstreamConfig, DEFAULT_BACKEND_URL,
};
