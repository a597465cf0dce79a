//! Prometheus metrics for garage-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec, HistogramVec,
    IntCounter, TextEncoder,
};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "garage_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Saved billing documents by type.
pub static DOCUMENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "garage_documents_total",
        "Total number of saved billing documents by type",
        &["document_type"] // tax, service, estimate, labour
    )
    .expect("Failed to register documents_total")
});

/// Tax invoices rolled back because a part had too little stock.
pub static STOCK_REJECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "garage_stock_rejections_total",
        "Tax invoice saves rejected for insufficient stock"
    )
    .expect("Failed to register stock_rejections_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "garage_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&DOCUMENTS_TOTAL);
    Lazy::force(&STOCK_REJECTIONS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_collectors_are_exported() {
        init_metrics();
        DOCUMENTS_TOTAL.with_label_values(&["tax"]).inc();
        STOCK_REJECTIONS_TOTAL.inc();

        let text = get_metrics();
        assert!(text.contains("garage_documents_total"));
        assert!(text.contains("garage_stock_rejections_total"));
    }
}
