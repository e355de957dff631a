//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, body cap, request ID)
//! - Construct the upload metrics at startup and inject them into handlers
//! - Bind the server to a listener and run it with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServiceConfig, UploadLimitsConfig};
use crate::http::greetings;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::upload::handler::upload;
use crate::upload::metrics::UploadSizeMetrics;

/// Slack on top of the request size limit for multipart boundaries and part
/// headers, so the hard body cap does not fire before our own limit checks.
const MULTIPART_FRAMING_SLACK: usize = 64 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upload_metrics: Arc<UploadSizeMetrics>,
    pub limits: UploadLimitsConfig,
}

/// HTTP server for the upload service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Registers the upload size distributions with the currently installed
    /// metrics recorder, so the exporter must already be in place.
    pub fn new(config: ServiceConfig) -> Self {
        let state = AppState {
            upload_metrics: Arc::new(UploadSizeMetrics::new()),
            limits: config.limits.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let body_cap = config.limits.max_request_size_bytes as usize + MULTIPART_FRAMING_SLACK;

        Router::new()
            .route("/greetings/{name}", get(greetings::greeting))
            .route("/multipartfileuploads", post(upload))
            .with_state(state)
            .layer(DefaultBodyLimit::max(body_cap))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
