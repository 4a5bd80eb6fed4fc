//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, route class
//! - `gateway_request_duration_seconds` (histogram): latency by route class
//! - `geocoding_upstream_failures_total` (counter): failed upstream calls by mode
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are low-cardinality: route class, never the raw path
//! - Extension methods share the `OTHER` label

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION: &str = "gateway_request_duration_seconds";
pub const UPSTREAM_FAILURES: &str = "geocoding_upstream_failures_total";

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &Method, status: u16, route: &'static str, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method_label(method),
        "status" => status.to_string(),
        "route" => route
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "route" => route).record(start.elapsed().as_secs_f64());
}

/// Standard methods keep their name; anything else is `OTHER`.
pub fn method_label(method: &Method) -> &'static str {
    const STANDARD: [&str; 9] = [
        "GET", "HEAD", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "CONNECT", "TRACE",
    ];
    STANDARD
        .into_iter()
        .find(|name| *name == method.as_str())
        .unwrap_or("OTHER")
}

pub fn record_upstream_failure(mode: &'static str) {
    counter!(UPSTREAM_FAILURES, "mode" => mode).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_request(&Method::GET, 200, "backend", Instant::now());
        record_upstream_failure("search");
    }

    #[test]
    fn extension_methods_fold_into_other() {
        assert_eq!(method_label(&Method::POST), "POST");
        assert_eq!(method_label(&Method::OPTIONS), "OPTIONS");
        for raw in ["PURGE", "X-RANDOM-1", "x-random-2"] {
            let method = Method::from_bytes(raw.as_bytes()).unwrap();
            assert_eq!(method_label(&method), "OTHER");
        }
    }
}
