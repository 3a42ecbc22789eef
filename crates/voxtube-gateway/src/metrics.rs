//! Prometheus metrics recording and endpoint.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus metrics recorder and return the handle for rendering.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Record a handled skill request with its duration.
pub fn record_request(action: &str, duration_secs: f64) {
    let labels = [("action", action.to_string())];
    metrics::counter!("skill_requests_total", &labels).increment(1);
    metrics::histogram!("skill_request_duration_seconds", &labels).record(duration_secs);
}

/// Record a reply that closed the voice session.
pub fn record_session_end(action: &str) {
    let labels = [("action", action.to_string())];
    metrics::counter!("skill_sessions_ended_total", &labels).increment(1);
}

/// Record a request body the gateway could not parse.
pub fn record_rejected() {
    metrics::counter!("skill_requests_rejected_total").increment(1);
}
