//! Metrics collection and exposition.
//!
//! # Metrics
//! - `seedbox_uploads_total` (counter): finished attempts by client, outcome
//! - `seedbox_step_duration_seconds` (histogram): time spent per network step
//! - `seedbox_metadata_failures_total` (counter): degraded label/directory fetches
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_upload(client: &'static str, outcome: &'static str) {
    counter!("seedbox_uploads_total", "client" => client, "outcome" => outcome).increment(1);
}

pub fn record_step_duration(step: &'static str, elapsed: Duration) {
    histogram!("seedbox_step_duration_seconds", "step" => step).record(elapsed.as_secs_f64());
}

pub fn record_metadata_failure() {
    counter!("seedbox_metadata_failures_total").increment(1);
}
