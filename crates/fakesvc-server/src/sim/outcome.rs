//! Simulated external dependency calls with a success probability.

use rand::Rng;

use super::{LatencyRange, Simulator};

impl Simulator {
    /// Simulated call to an external dependency.
    ///
    /// Always pays the external-call latency first, then succeeds with
    /// `success_probability` (`0.0` never succeeds, `1.0` always does). The
    /// outcome is counted under `external_api_calls_total{api_name, status}`.
    pub async fn attempt(&self, name: &str, success_probability: f64) -> bool {
        self.simulate_range(LatencyRange::EXTERNAL_CALL).await;

        let p = success_probability.clamp(0.0, 1.0);
        let success = self.with_rng(|rng| rng.gen::<f64>() < p);
        self.metrics.external_call(name, success);

        if success {
            tracing::info!(api_name = name, "external api call succeeded");
        } else {
            tracing::warn!(api_name = name, "external api call failed");
        }
        success
    }
}
