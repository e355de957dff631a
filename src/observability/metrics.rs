//! Metrics exposition.
//!
//! Installs the Prometheus exporter as the global recorder and serves the
//! scrape endpoint on its own listener. Histograms are rendered as summaries
//! with the quantiles below, which is what the upload size distributions rely
//! on for percentile estimation.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Quantiles published for every summary (p50/p75/p95/p99.9).
pub const SUMMARY_QUANTILES: &[f64] = &[0.5, 0.75, 0.95, 0.999];

/// Install the Prometheus exporter, listening on `addr`.
///
/// Must be called from within a Tokio runtime, before any histogram handles
/// are created. Failure to install is logged and leaves the no-op recorder in
/// place; the service keeps running without metrics.
pub fn init_metrics(addr: SocketAddr) {
    let builder = match PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_quantiles(SUMMARY_QUANTILES)
    {
        Ok(builder) => builder,
        Err(err) => {
            tracing::error!(error = %err, "Invalid metrics quantile configuration");
            return;
        }
    };

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}
