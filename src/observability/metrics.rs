//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lifeline_worker_exits_total` (counter): worker exits by worker, outcome
//! - `lifeline_signals_received_total` (counter): signals by name, action
//! - `lifeline_shutdown_requests_total` (counter): HTTP shutdown requests

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a worker's terminal outcome (`clean`, `error`, `panic`).
pub fn record_worker_exit(worker: &str, outcome: &'static str) {
    counter!(
        "lifeline_worker_exits_total",
        "worker" => worker.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a received signal and what the watcher did with it.
pub fn record_signal(signal: &'static str, action: &'static str) {
    counter!("lifeline_signals_received_total", "signal" => signal, "action" => action).increment(1);
}

pub fn record_shutdown_request() {
    counter!("lifeline_shutdown_requests_total").increment(1);
}
