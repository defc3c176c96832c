//! Prometheus metrics for knightbites-service.
//!
//! Exposes per-statement collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Statement latency including connection acquisition.
    pub static ref QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "knightbites_query_duration_seconds",
        "Statement execution duration segmented by statement name",
        &["statement"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("failed to register knightbites_query_duration_seconds");

    /// Executed statements by outcome (none/one/many or an error kind).
    pub static ref QUERY_TOTAL: IntCounterVec = register_int_counter_vec!(
        "knightbites_query_total",
        "Executed statements segmented by statement name and outcome",
        &["statement", "outcome"]
    )
    .expect("failed to register knightbites_query_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("metrics encoding failed: {}", err);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
