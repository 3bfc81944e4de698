// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    CONVERSIONS_TOTAL,
    CACHE_OPERATIONS,
    CACHE_ENTRIES,
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

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record how a convert/explain call was answered
pub fn record_conversion(operation: &str, outcome: &str) {
    CONVERSIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

/// Helpers to record result cache operations
pub fn record_cache_hit(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "hit"]).inc();
}

pub fn record_cache_miss(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "miss"]).inc();
}

pub fn record_cache_store(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "store"]).inc();
}

pub fn update_cache_entries(cache: &str, count: usize) {
    CACHE_ENTRIES.with_label_values(&[cache]).set(count as f64);
}
