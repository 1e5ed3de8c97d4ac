//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate outcomes by decision
//! - `gate_session_errors_total` (counter): failed session lookups
//! - `insights_requests_total` (counter): query endpoint responses by status
//! - `insights_request_duration_seconds` (histogram): query endpoint latency
//!
//! # Design Decisions
//! - `metrics` facade: recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own scrape listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: &'static str) {
    counter!("gate_decisions_total", "decision" => decision).increment(1);
}

pub fn record_session_error() {
    counter!("gate_session_errors_total").increment(1);
}

pub fn record_insights_request(status: u16, start: Instant) {
    counter!("insights_requests_total", "status" => status.to_string()).increment(1);
    histogram!("insights_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
