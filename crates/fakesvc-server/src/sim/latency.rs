//! Simulated latency: named delay ranges and the sleeping primitives.

use std::time::{Duration, Instant};

use rand::Rng;

use super::Simulator;

/// Inclusive delay bounds in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRange {
    pub lower: f64,
    pub upper: f64,
}

impl LatencyRange {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub const SELECT: Self = Self::new(0.01, 0.1);
    pub const SELECT_BY_ID: Self = Self::new(0.01, 0.05);
    pub const INSERT_USER: Self = Self::new(0.02, 0.15);
    pub const INSERT_ORDER: Self = Self::new(0.05, 0.2);
    pub const SELECT_WITH_JOIN: Self = Self::new(0.1, 0.3);
    pub const ANALYTICS: Self = Self::new(0.2, 0.5);
    pub const EXTERNAL_CALL: Self = Self::new(0.05, 0.3);

    /// Swap inverted bounds, clamp at zero, treat non-finite as zero.
    fn normalized(self) -> (f64, f64) {
        let fix = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let (a, b) = (fix(self.lower), fix(self.upper));
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl Simulator {
    fn draw_delay(&self, range: LatencyRange) -> Duration {
        let (lo, hi) = range.normalized();
        let secs = if hi > lo {
            self.with_rng(|rng| rng.gen_range(lo..=hi))
        } else {
            lo
        };
        Duration::try_from_secs_f64(secs * self.latency_scale).unwrap_or_default()
    }

    /// Sleep for a uniform delay in `[lower, upper]` seconds and return the
    /// elapsed wall-clock time. Only this task is suspended.
    pub async fn simulate(&self, lower: f64, upper: f64) -> Duration {
        self.simulate_range(LatencyRange::new(lower, upper)).await
    }

    pub async fn simulate_range(&self, range: LatencyRange) -> Duration {
        let delay = self.draw_delay(range);
        let started = Instant::now();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        started.elapsed()
    }

    /// Simulated database round-trip, recorded under `db_query_duration_seconds`.
    pub async fn db_query(&self, query_type: &str, range: LatencyRange) -> Duration {
        let elapsed = self.simulate_range(range).await;
        self.metrics.db_query(query_type, elapsed);
        tracing::info!(query_type, duration = elapsed.as_secs_f64(), "db query executed");
        elapsed
    }
}
