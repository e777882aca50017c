//! Metrics collection and exposition.
//!
//! # Metrics
//! - `voucher_requests_total` (counter): requests by endpoint, status
//! - `voucher_request_duration_seconds` (histogram): latency distribution
//! - `voucher_claims_total` (counter): claim pipeline outcomes
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Labels for endpoint, status code, claim outcome
//! - Prometheus exporter on its own listener

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "voucher_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("voucher_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one claim pipeline outcome.
pub fn record_claim(outcome: &'static str) {
    counter!("voucher_claims_total", "outcome" => outcome).increment(1);
}
