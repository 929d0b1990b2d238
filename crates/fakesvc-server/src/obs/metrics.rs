//! In-process metrics registry.
//!
//! Metric families are registered by name with a fixed kind and an ordered
//! list of label names. Each family stores one series per label-value tuple,
//! backed by `DashMap` + atomics so recording never takes a global lock.
//! Floating point values are kept as `f64` bit patterns inside `AtomicU64`.
//!
//! `snapshot` renders the Prometheus text exposition format with families
//! sorted by name and series sorted by label values, so output is stable
//! between scrapes.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fakesvc_core::error::{FakeSvcError, Result};

/// Default Prometheus buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Point-in-time read of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Counter(f64),
    Gauge(f64),
    Histogram { count: u64, sum: f64 },
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Lock-free `f64` cell.
#[derive(Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, delta: f64) {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicF64,
    buckets: [AtomicU64; DEFAULT_BUCKETS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl AtomicHistogram {
    fn observe(&self, secs: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.add(secs);
        // Cumulative: every bucket whose bound covers the value.
        for (i, &le) in DEFAULT_BUCKETS.iter().enumerate() {
            if secs <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

enum Series {
    Counter(AtomicF64),
    Gauge(AtomicF64),
    Histogram(AtomicHistogram),
}

impl Series {
    fn new(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Counter => Series::Counter(AtomicF64::default()),
            MetricKind::Gauge => Series::Gauge(AtomicF64::default()),
            MetricKind::Histogram => Series::Histogram(AtomicHistogram::default()),
        }
    }

    fn sample(&self) -> Sample {
        match self {
            Series::Counter(c) => Sample::Counter(c.load()),
            Series::Gauge(g) => Sample::Gauge(g.load()),
            Series::Histogram(h) => Sample::Histogram {
                count: h.count.load(Ordering::Relaxed),
                sum: h.sum.load(),
            },
        }
    }
}

struct Family {
    help: String,
    kind: MetricKind,
    label_names: Vec<String>,
    series: DashMap<Vec<String>, Series>,
}

impl Family {
    fn series_key(&self, name: &str, label_values: &[&str]) -> Result<Vec<String>> {
        if label_values.len() != self.label_names.len() {
            return Err(FakeSvcError::Configuration(format!(
                "metric {name} expects {} label values, got {}",
                self.label_names.len(),
                label_values.len()
            )));
        }
        Ok(label_values.iter().map(|v| v.to_string()).collect())
    }

    fn with_series<R>(
        &self,
        name: &str,
        label_values: &[&str],
        f: impl FnOnce(&Series) -> R,
    ) -> Result<R> {
        let key = self.series_key(name, label_values)?;
        let series = self
            .series
            .entry(key)
            .or_insert_with(|| Series::new(self.kind));
        Ok(f(series.value()))
    }

    fn label_str(&self, values: &[String]) -> String {
        self.label_names
            .iter()
            .zip(values)
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(&self.help));
        let _ = writeln!(out, "# TYPE {} {}", name, self.kind.as_str());

        let mut keys: Vec<Vec<String>> = self.series.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(series) = self.series.get(&key) else { continue };
            let label_str = self.label_str(&key);
            let braces = if label_str.is_empty() {
                String::new()
            } else {
                format!("{{{}}}", label_str)
            };

            match series.value() {
                Series::Counter(v) | Series::Gauge(v) => {
                    let _ = writeln!(out, "{}{} {}", name, braces, v.load());
                }
                Series::Histogram(h) => {
                    let prefix = if label_str.is_empty() {
                        String::new()
                    } else {
                        format!("{},", label_str)
                    };
                    // Debug keeps the `.0` on whole bounds: `le="1.0"`.
                    for (i, &le) in DEFAULT_BUCKETS.iter().enumerate() {
                        let count = h.buckets[i].load(Ordering::Relaxed);
                        let _ = writeln!(out, "{}_bucket{{{}le=\"{:?}\"}} {}", name, prefix, le, count);
                    }
                    let count = h.count.load(Ordering::Relaxed);
                    let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
                    let _ = writeln!(out, "{}_sum{} {}", name, braces, h.sum.load());
                    let _ = writeln!(out, "{}_count{} {}", name, braces, count);
                }
            }
        }
    }
}

/// Process-wide registry of named metric families.
#[derive(Default)]
pub struct MetricRegistry {
    families: DashMap<String, Arc<Family>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Re-registering with the same kind and label names is
    /// a no-op; any other shape is a `Configuration` error.
    pub fn register(
        &self,
        name: &str,
        help: &str,
        kind: MetricKind,
        label_names: &[&str],
    ) -> Result<()> {
        if !valid_metric_name(name) {
            return Err(FakeSvcError::Configuration(format!("invalid metric name: {name:?}")));
        }
        if let Some(bad) = label_names.iter().find(|l| !valid_label_name(l) || **l == "le") {
            return Err(FakeSvcError::Configuration(format!(
                "invalid label name {bad:?} for metric {name}"
            )));
        }

        let family = self
            .families
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(Family {
                    help: help.to_string(),
                    kind,
                    label_names: label_names.iter().map(|l| l.to_string()).collect(),
                    series: DashMap::new(),
                })
            })
            .value()
            .clone();

        if family.kind != kind || family.label_names != label_names {
            return Err(FakeSvcError::Configuration(format!(
                "metric {name} already registered as {} {:?}",
                family.kind.as_str(),
                family.label_names
            )));
        }
        Ok(())
    }

    fn family(&self, name: &str) -> Result<Arc<Family>> {
        self.families
            .get(name)
            .map(|f| Arc::clone(f.value()))
            .ok_or_else(|| FakeSvcError::UnknownMetric(name.to_string()))
    }

    /// Update one series: counters add, gauges set, histograms observe.
    pub fn record(&self, name: &str, label_values: &[&str], value: f64) -> Result<()> {
        let family = self.family(name)?;
        if family.kind == MetricKind::Counter && !(value >= 0.0) {
            return Err(FakeSvcError::Configuration(format!(
                "counter {name} cannot move by {value}"
            )));
        }
        family.with_series(name, label_values, |series| match series {
            Series::Counter(c) => c.add(value),
            Series::Gauge(g) => g.store(value),
            Series::Histogram(h) => h.observe(value),
        })
    }

    /// Increment a counter or gauge by one.
    pub fn inc(&self, name: &str, label_values: &[&str]) -> Result<()> {
        let family = self.family(name)?;
        family.with_series(name, label_values, |series| match series {
            Series::Counter(v) | Series::Gauge(v) => {
                v.add(1.0);
                Ok(())
            }
            Series::Histogram(_) => Err(FakeSvcError::Configuration(format!(
                "histogram {name} cannot be incremented"
            ))),
        })?
    }

    /// Observe a duration (in seconds) into a histogram.
    pub fn observe(&self, name: &str, label_values: &[&str], duration: Duration) -> Result<()> {
        let family = self.family(name)?;
        if family.kind != MetricKind::Histogram {
            return Err(FakeSvcError::Configuration(format!("metric {name} is not a histogram")));
        }
        self.record(name, label_values, duration.as_secs_f64())
    }

    /// Read back one series, `None` when it has never been recorded.
    pub fn sample(&self, name: &str, label_values: &[&str]) -> Option<Sample> {
        let family = self.family(name).ok()?;
        let key = family.series_key(name, label_values).ok()?;
        let series = family.series.get(&key)?;
        Some(series.value().sample())
    }

    /// Render every family in Prometheus text exposition format.
    pub fn snapshot(&self) -> String {
        let mut names: Vec<String> = self.families.iter().map(|r| r.key().clone()).collect();
        names.sort();

        let mut out = String::new();
        for name in names {
            if let Ok(family) = self.family(&name) {
                family.render(&name, &mut out);
            }
        }
        out
    }
}
