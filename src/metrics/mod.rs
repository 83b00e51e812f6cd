// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    ANALYSES_TOTAL,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    TRANSLATIONS_TOTAL,
    REPORTS_TOTAL,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record Gemini API call metrics.
///
/// `status_code` is `0` when no HTTP response was received.
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Record the outcome of one `analyze` call: `success` or a failure kind.
pub fn record_analysis(outcome: &str) {
    ANALYSES_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_translation(outcome: &str) {
    TRANSLATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_report(success: bool) {
    let status = if success { "success" } else { "failure" };
    REPORTS_TOTAL.with_label_values(&[status]).inc();
}
