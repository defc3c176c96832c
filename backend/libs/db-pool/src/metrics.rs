//! Pool gauges and connection acquisition metrics
//!
//! All collectors carry a `service` label so several pools can share the
//! default registry.

use prometheus::{register_histogram_vec, register_int_counter_vec, register_int_gauge_vec};
use prometheus::{HistogramVec, IntCounterVec, IntGaugeVec};
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use std::time::Instant;

lazy_static::lazy_static! {
    static ref POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Pool connections by state (idle, in_use, max)",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref ACQUIRE_SECONDS: HistogramVec = register_histogram_vec!(
        "db_pool_acquire_duration_seconds",
        "Time spent waiting for a pooled connection, including failed waits",
        &["service"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref ACQUIRE_ERRORS: IntCounterVec = register_int_counter_vec!(
        "db_pool_connection_errors_total",
        "Failed connection acquisitions by cause",
        &["service", "error_type"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Label for a failed acquisition
fn acquire_error_label(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::PoolTimedOut => "timeout",
        sqlx::Error::PoolClosed => "closed",
        sqlx::Error::Io(_) => "io",
        sqlx::Error::Tls(_) => "tls",
        sqlx::Error::Configuration(_) => "configuration",
        _ => "other",
    }
}

pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    let open = pool.size() as i64;
    let idle = pool.num_idle() as i64;
    let max = pool.options().get_max_connections() as i64;

    for (state, value) in [("idle", idle), ("in_use", open - idle), ("max", max)] {
        POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(value);
    }
}

/// `pool.acquire()` with latency and failure accounting.
///
/// The histogram observes failed waits too, so a pool that cannot reach the
/// server shows up as a cluster at the acquire timeout.
pub async fn acquire_with_metrics(
    pool: &PgPool,
    service: &str,
) -> Result<PoolConnection<Postgres>, sqlx::Error> {
    let start = Instant::now();
    let result = pool.acquire().await;

    ACQUIRE_SECONDS
        .with_label_values(&[service])
        .observe(start.elapsed().as_secs_f64());

    if let Err(err) = &result {
        ACQUIRE_ERRORS
            .with_label_values(&[service, acquire_error_label(err)])
            .inc();
    }

    result
}
