//! Multipart file uploads demo service.
//!
//! A small HTTP service built with Tokio and Axum, exposing:
//!
//! - `GET /greetings/{name}`: plain-text greeting
//! - `POST /multipartfileuploads`: multipart upload with per-part and
//!   per-request size limits
//!
//! Rejected uploads are classified (part limit vs. total request limit) and the
//! offending size is recorded into a Prometheus summary, one distribution per
//! violation kind.

// Core subsystems
pub mod config;
pub mod http;
pub mod upload;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "upload-service")]
#[command(about = "Multipart file uploads demo service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init_logging();

    tracing::info!("upload-service v0.1.0 starting");

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => config::loader::load_config(&path)?,
        None => ServiceConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_part_size_bytes = config.limits.max_part_size_bytes,
        max_request_size_bytes = config.limits.max_request_size_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // The exporter must be installed before the server constructs its
    // histogram handles, otherwise observations go to the no-op recorder.
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
