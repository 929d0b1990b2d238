//! Latency and outcome simulation for the fake backend.
//!
//! A single `Simulator` owns the random source. It is seeded from config when
//! a seed is given, otherwise from OS entropy. The RNG lock is only held for a
//! single draw, never across a sleep.

pub mod latency;
pub mod outcome;

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::obs::ServiceMetrics;

pub use latency::LatencyRange;

/// Range the "active users" sample is drawn from.
const ACTIVE_USERS_SAMPLE: std::ops::RangeInclusive<u32> = 10..=100;

pub struct Simulator {
    rng: Mutex<StdRng>,
    latency_scale: f64,
    metrics: Arc<ServiceMetrics>,
}

impl Simulator {
    pub fn new(seed: Option<u64>, latency_scale: f64, metrics: Arc<ServiceMetrics>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            latency_scale: latency_scale.max(0.0),
            metrics,
        }
    }

    fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        // Poison is ignored: the RNG carries no invariant.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Random stand-in for a live "active users" reading.
    pub fn sample_active_users(&self) -> u32 {
        self.with_rng(|rng| rng.gen_range(ACTIVE_USERS_SAMPLE))
    }
}
