//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
///
/// Installs the global Prometheus recorder and panics if another `metrics`
/// recorder is already installed in the process.
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "relay_requests_total",
        "Relay requests by outcome"
    );
    metrics::describe_counter!(
        "relay_events_total",
        "Upstream lines processed, by classification"
    );
    metrics::describe_histogram!(
        "relay_stream_duration_seconds",
        "Time from request start to end of the relayed stream"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a request outcome
pub fn record_request(outcome: &str) {
    metrics::counter!("relay_requests_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record one processed upstream line
pub fn record_event(kind: &str) {
    metrics::counter!("relay_events_total", "kind" => kind.to_string()).increment(1);
}

/// Record the duration of a finished stream
pub fn record_stream_duration(duration_secs: f64) {
    metrics::histogram!("relay_stream_duration_seconds").record(duration_secs);
}
