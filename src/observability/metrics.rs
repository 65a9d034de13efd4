//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define linking metrics (attached, soft miss, malformed)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `tracelink_links_attached_total` (counter): links attached, by channel
//! - `tracelink_soft_miss_total` (counter): operations with no correlation
//!   data, by channel
//! - `tracelink_malformed_traceparent_total` (counter): attributes that
//!   failed traceparent validation
//!
//! # Design Decisions
//! - Counters only; linking has no interesting latency distribution
//! - Without an installed recorder every call is a no-op, so library users
//!   and tests pay nothing

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    if let Err(e) = builder.install() {
        tracing::error!(error = %e, "Failed to install metrics exporter");
        return;
    }

    describe_counter!(
        "tracelink_links_attached_total",
        "Telemetry links attached to consumer operations"
    );
    describe_counter!(
        "tracelink_soft_miss_total",
        "Consumer operations with no correlation data"
    );
    describe_counter!(
        "tracelink_malformed_traceparent_total",
        "Traceparent attributes that failed validation"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
}

pub fn record_link_attached(channel: &'static str) {
    counter!("tracelink_links_attached_total", "channel" => channel).increment(1);
}

pub fn record_soft_miss(channel: &'static str) {
    counter!("tracelink_soft_miss_total", "channel" => channel).increment(1);
}

pub fn record_malformed_traceparent() {
    counter!("tracelink_malformed_traceparent_total").increment(1);
}
