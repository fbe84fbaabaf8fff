//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, source
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_cache_hits_total` / `proxy_cache_misses_total` (counters)
//! - `proxy_upstream_attempts_total` / `proxy_upstream_failures_total`
//!   (counters, failures labelled by kind)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Must run inside the Tokio runtime; the exporter serves scrapes from a
/// background task. Failure to install is logged, not fatal — the proxy
/// works without metrics.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
///
/// `source` says where the response came from: `cache`, `upstream`, or
/// `error`.
pub fn record_request(method: &str, status: u16, source: &str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a summary served straight from the cache.
pub fn record_cache_hit() {
    counter!("proxy_cache_hits_total").increment(1);
}

/// Record a lookup that had to go upstream.
pub fn record_cache_miss() {
    counter!("proxy_cache_misses_total").increment(1);
}

/// Record one upstream fetch attempt.
pub fn record_upstream_attempt() {
    counter!("proxy_upstream_attempts_total").increment(1);
}

/// Record one failed upstream attempt.
pub fn record_upstream_failure(kind: &'static str) {
    counter!("proxy_upstream_failures_total", "kind" => kind).increment(1);
}
