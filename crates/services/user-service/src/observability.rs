//! Prometheus metrics.
//!
//! Handles are built once and passed to the components that record them.
//! The recorder must be installed before the handles are built; handles built
//! without a recorder are no-ops, which is what tests get.

use std::collections::HashMap;

use axum::http::Method;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Counter,
    Histogram,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Metric names.
pub mod names {
    pub const CACHE_LOOKUPS_TOTAL: &str = "user_cache_lookups_total";
    pub const CACHE_WRITES_TOTAL: &str = "user_cache_writes_total";
    pub const REQUESTS_TOTAL: &str = "total_requests_count";
    pub const REQUEST_LATENCY_SECONDS: &str = "request_latency_seconds";
    pub const APP_INFO: &str = "app_info";
}

/// Install the Prometheus recorder and publish `app_info`.
pub fn install_recorder(version: &str) -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(names::CACHE_LOOKUPS_TOTAL, "User cache lookups by outcome");
    describe_counter!(names::CACHE_WRITES_TOTAL, "User cache write-backs by outcome");
    describe_counter!(names::REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(
        names::REQUEST_LATENCY_SECONDS,
        "HTTP request latency in seconds"
    );
    describe_gauge!(names::APP_INFO, "Application build information");

    gauge!(names::APP_INFO, "version" => version.to_string()).set(1.0);
    info!(version, "Prometheus metrics recorder installed");

    Ok(handle)
}

/// Counters for one cached read operation.
#[derive(Clone)]
pub struct LookupCounters {
    pub hit: Counter,
    pub miss: Counter,
    /// Cache unreachable or failing; handled as a miss
    pub backend_error: Counter,
    /// Cached value could not be decoded
    pub decode_error: Counter,
    pub stored: Counter,
    pub write_failed: Counter,
}

impl LookupCounters {
    fn new(operation: &'static str) -> Self {
        let lookup = |outcome: &'static str| {
            counter!(
                names::CACHE_LOOKUPS_TOTAL,
                "operation" => operation,
                "outcome" => outcome
            )
        };
        let write = |outcome: &'static str| {
            counter!(
                names::CACHE_WRITES_TOTAL,
                "operation" => operation,
                "outcome" => outcome
            )
        };

        Self {
            hit: lookup("hit"),
            miss: lookup("miss"),
            backend_error: lookup("backend_error"),
            decode_error: lookup("decode_error"),
            stored: write("stored"),
            write_failed: write("failed"),
        }
    }
}

/// Cache-aside metrics, one counter set per read operation.
#[derive(Clone)]
pub struct CacheMetrics {
    pub list_users: LookupCounters,
    pub get_user: LookupCounters,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            list_users: LookupCounters::new("list_users"),
            get_user: LookupCounters::new("get_user"),
        }
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP request count and latency.
#[derive(Clone)]
pub struct HttpMetrics {
    requests: Counter,
    latency: HashMap<Method, Histogram>,
    latency_other: Histogram,
}

impl HttpMetrics {
    pub fn new() -> Self {
        let latency = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ]
        .into_iter()
        .map(|method| {
            let handle =
                histogram!(names::REQUEST_LATENCY_SECONDS, "method" => method.as_str().to_string());
            (method, handle)
        })
        .collect();

        Self {
            requests: counter!(names::REQUESTS_TOTAL),
            latency,
            latency_other: histogram!(names::REQUEST_LATENCY_SECONDS, "method" => "OTHER"),
        }
    }

    /// Record one finished request.
    pub fn record(&self, method: &Method, seconds: f64) {
        self.requests.increment(1);
        self.latency
            .get(method)
            .unwrap_or(&self.latency_other)
            .record(seconds);
    }
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}
