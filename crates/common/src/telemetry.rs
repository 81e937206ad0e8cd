//! Prometheus metrics shared by every crate
//!
//! Metrics go through the `metrics` facade. The binary installs a
//! [`PrometheusRecorder`] once at startup and serves [`PrometheusHandle::render`]
//! on `GET /metrics`.

use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Histogram of statement latency, labelled by `query`
pub const DB_QUERY_DURATION: &str = "db_query_duration_seconds";

/// Connections currently held by the pool
pub const DB_ACTIVE_CONNECTIONS: &str = "db_active_connections";

/// Prometheus client default buckets
const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Recorder with bucketed latency histograms. Not installed.
pub fn build_recorder() -> Result<PrometheusRecorder> {
    let recorder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(DB_QUERY_DURATION.to_string()),
            &DEFAULT_BUCKETS,
        )
        .map_err(|e| Error::Internal(format!("invalid histogram buckets: {}", e)))?
        .build_recorder();
    Ok(recorder)
}

/// Install the process-wide recorder and return a handle for rendering
pub fn install_recorder() -> Result<PrometheusHandle> {
    let recorder = build_recorder()?;
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)
        .map_err(|e| Error::Internal(format!("metrics recorder already installed: {}", e)))?;
    describe();
    Ok(handle)
}

fn describe() {
    metrics::describe_histogram!(
        DB_QUERY_DURATION,
        metrics::Unit::Seconds,
        "Duration of database queries"
    );
    metrics::describe_gauge!(DB_ACTIVE_CONNECTIONS, "Number of active database connections");
}

pub fn record_query_duration(query: &'static str, elapsed: Duration) {
    metrics::histogram!(DB_QUERY_DURATION, "query" => query).record(elapsed.as_secs_f64());
}

/// Time `fut` and record it under `query`, whatever its outcome
pub async fn timed<F: std::future::Future>(query: &'static str, fut: F) -> F::Output {
    let started = Instant::now();
    let output = fut.await;
    record_query_duration(query, started.elapsed());
    output
}

pub fn record_pool_stats(pool: &PgPool) {
    metrics::gauge!(DB_ACTIVE_CONNECTIONS).set(f64::from(pool.size()));
}

/// Sample pool statistics every `every` until the pool is closed.
///
/// When a handle is given its histogram upkeep runs on the same tick.
pub fn spawn_pool_monitor(
    pool: PgPool,
    every: Duration,
    handle: Option<PrometheusHandle>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                tracing::debug!("Pool closed, stopping connection monitor");
                break;
            }
            record_pool_stats(&pool);
            if let Some(handle) = &handle {
                handle.run_upkeep();
            }
        }
    })
}
