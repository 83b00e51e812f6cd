// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // HTTP METRICS
    // ============================================================================

    /// Total number of HTTP requests served
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // ANALYSIS METRICS
    // ============================================================================

    /// Analyses by outcome (success or a failure kind)
    pub static ref ANALYSES_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("analyses_total", "Total image analyses by outcome"),
        &["outcome"],
        REGISTRY
    ).unwrap();

    /// Total Gemini API calls
    pub static ref GEMINI_API_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("gemini_api_calls_total", "Total Gemini API calls"),
        &["model", "status_code"],
        REGISTRY
    ).unwrap();

    /// Gemini API call duration
    pub static ref GEMINI_API_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("gemini_api_duration_seconds", "Gemini API call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["model"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // TRANSLATION & REPORT METRICS
    // ============================================================================

    /// Translations by outcome: translated, skipped, fallback
    pub static ref TRANSLATIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("translations_total", "Total translation attempts by outcome"),
        &["outcome"],
        REGISTRY
    ).unwrap();

    /// Rendered reports: success, failure
    pub static ref REPORTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("reports_total", "Total PDF reports rendered"),
        &["status"],
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
