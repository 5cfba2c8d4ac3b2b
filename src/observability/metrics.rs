//! Dispatch metrics.
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatched requests by handler, method, status
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_param_errors_total` (counter): rejected parameters by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram, Label};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::params::ParamError;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(handler: &str, method: &str, status: u16, start: Instant) {
    let labels = vec![
        Label::new("handler", handler.to_string()),
        Label::new("method", method.to_string()),
        Label::new("status", status.to_string()),
    ];
    counter!("router_requests_total", labels.clone()).increment(1);
    histogram!("router_request_duration_seconds", labels).record(start.elapsed().as_secs_f64());
}

pub fn record_param_error(handler: &str, error: &ParamError) {
    let kind = match error {
        ParamError::RequiredMissing { .. } => "required",
        ParamError::ValueParse { .. } => "parse",
        ParamError::Validation { .. } => "validation",
    };
    counter!("router_param_errors_total", "handler" => handler.to_string(), "kind" => kind).increment(1);
}
