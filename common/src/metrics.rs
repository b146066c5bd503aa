// Metrics recording helpers shared by the request pipeline
use metrics::{counter, histogram};

/// Thin facade over the `metrics` macros so handlers record through one
/// injected collector instead of scattering metric names around.
#[derive(Debug, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string(),
        )
        .increment(1);
    }

    pub fn record_http_latency(&self, path: &str, latency_ms: f64) {
        histogram!("http_request_duration_ms", "path" => path.to_string()).record(latency_ms);
    }

    pub fn record_cache_hit(&self, path: &str) {
        counter!("cache_hits_total", "path" => path.to_string()).increment(1);
    }

    pub fn record_cache_miss(&self, path: &str) {
        counter!("cache_misses_total", "path" => path.to_string()).increment(1);
    }

    pub fn record_graph_failure(&self) {
        counter!("graph_query_failures_total").increment(1);
    }
}
