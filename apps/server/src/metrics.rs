//! Prometheus metrics for the catalog search server

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// Requests currently being served
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "catalog_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// Search calls by domain (`datasets`, `flow_jobs`), execution path, and outcome
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_search_total",
        "Total number of faceted search calls",
        &["domain", "path", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Search duration including both the window and the count query
    pub static ref SEARCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_search_duration_seconds",
        "Faceted search duration in seconds",
        &["domain", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register SEARCH_DURATION_SECONDS");

    /// Exact match totals reported by searches
    pub static ref SEARCH_MATCHES: HistogramVec = register_histogram_vec!(
        "catalog_search_matches",
        "Exact number of matches reported by search",
        &["domain"],
        vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, 100000.0]
    )
    .expect("Failed to register SEARCH_MATCHES");
}

/// Collapse free-form path segments so label cardinality stays bounded.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with("/api/v1/advsearch/") || trimmed == "/health" || trimmed == "/metrics"
    {
        return trimmed.to_string();
    }
    "/other".to_string()
}

pub fn record_search(domain: &str, path: &str, outcome: &str, seconds: f64) {
    SEARCH_TOTAL.with_label_values(&[domain, path, outcome]).inc();
    SEARCH_DURATION_SECONDS
        .with_label_values(&[domain, path])
        .observe(seconds);
}

pub fn record_matches(domain: &str, count: i64) {
    SEARCH_MATCHES
        .with_label_values(&[domain])
        .observe(count.max(0) as f64);
}
