//! Tenant gateway binary.
//!
//! ```text
//!   Browser ──/api/jobs/admin/jobs?page=2──▶ ┌────────────────┐
//!   (x-tenant-subdomain, Authorization)      │ tenant-gateway │──▶ BACKEND_URL/jobs/admin/jobs?page=2
//!   ◀──── { success, data | message } ────── └────────────────┘◀── backend status + body
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tenant_gateway::config::load_config;
use tenant_gateway::observability::{logging, metrics};
use tenant_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "tenant-gateway")]
#[command(about = "Tenant-aware proxy in front of the recruitment backend API", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("tenant-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.upstream.base_url,
        mount_prefix = %config.proxy.mount_prefix,
        derive_tenant_from_host = config.tenant.derive_from_host,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
