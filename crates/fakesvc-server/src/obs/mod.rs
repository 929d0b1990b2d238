//! Lightweight in-process observability.
//!
//! Metrics are stored as atomics in a named registry and rendered by the
//! `/metrics` handler. `http` holds the request instrumentation middleware.

pub mod http;
pub mod metrics;
pub mod service;

pub use metrics::{MetricKind, MetricRegistry, Sample};
pub use service::ServiceMetrics;
