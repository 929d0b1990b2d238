//! Metric families emitted by the fake service.
//!
//! Registration happens once in `ServiceMetrics::new`; the typed helpers below
//! are what the middleware, simulators and cache call. Recording failures are
//! logged and swallowed so instrumentation never fails a request.

use std::sync::Arc;
use std::time::Duration;

use fakesvc_core::error::Result;

use super::metrics::{MetricKind, MetricRegistry};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const DB_QUERY_DURATION: &str = "db_query_duration_seconds";
pub const EXTERNAL_API_CALLS_TOTAL: &str = "external_api_calls_total";
pub const ACTIVE_USERS: &str = "active_users";
pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";

const FAMILIES: [(&str, &str, MetricKind, &[&str]); 7] = [
    (HTTP_REQUESTS_TOTAL, "Total HTTP requests", MetricKind::Counter, &["method", "endpoint", "status"]),
    (HTTP_REQUEST_DURATION, "HTTP request duration in seconds", MetricKind::Histogram, &["method", "endpoint"]),
    (DB_QUERY_DURATION, "Database query duration in seconds", MetricKind::Histogram, &["query_type"]),
    (EXTERNAL_API_CALLS_TOTAL, "Total external API calls", MetricKind::Counter, &["api_name", "status"]),
    (ACTIVE_USERS, "Number of active users", MetricKind::Gauge, &[]),
    (CACHE_HITS_TOTAL, "Total cache hits", MetricKind::Counter, &["cache_name"]),
    (CACHE_MISSES_TOTAL, "Total cache misses", MetricKind::Counter, &["cache_name"]),
];

fn log_failure(res: Result<()>) {
    if let Err(e) = res {
        tracing::warn!(error = %e, "metric record failed");
    }
}

pub struct ServiceMetrics {
    registry: Arc<MetricRegistry>,
}

impl ServiceMetrics {
    /// Register every service family on `registry`.
    pub fn new(registry: Arc<MetricRegistry>) -> Result<Self> {
        for (name, help, kind, labels) in FAMILIES {
            registry.register(name, help, kind, labels)?;
        }
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn http_request(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        log_failure(self.registry.inc(HTTP_REQUESTS_TOTAL, &[method, path, &status]));
        log_failure(self.registry.observe(HTTP_REQUEST_DURATION, &[method, path], elapsed));
    }

    pub fn db_query(&self, query_type: &str, elapsed: Duration) {
        log_failure(self.registry.observe(DB_QUERY_DURATION, &[query_type], elapsed));
    }

    pub fn external_call(&self, api_name: &str, success: bool) {
        let status = if success { "success" } else { "failure" };
        log_failure(self.registry.inc(EXTERNAL_API_CALLS_TOTAL, &[api_name, status]));
    }

    pub fn cache_lookup(&self, cache_name: &str, hit: bool) {
        let name = if hit { CACHE_HITS_TOTAL } else { CACHE_MISSES_TOTAL };
        log_failure(self.registry.inc(name, &[cache_name]));
    }

    pub fn set_active_users(&self, n: u32) {
        log_failure(self.registry.record(ACTIVE_USERS, &[], f64::from(n)));
    }

    pub fn inc_active_users(&self) {
        log_failure(self.registry.inc(ACTIVE_USERS, &[]));
    }

    /// Prometheus text exposition of the whole registry.
    pub fn render(&self) -> String {
        self.registry.snapshot()
    }
}
