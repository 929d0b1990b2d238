//! Shared application state for the fake service.
//!
//! Everything that outlives a request (metrics, simulator, cache, store) is
//! owned here and handed to handlers through axum `State`. Tests build a fresh
//! `AppState` per case instead of sharing process-wide singletons.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fakesvc_core::error::Result;

use crate::cache::Cache;
use crate::config::{ServiceConfig, SuccessRates};
use crate::obs::{MetricRegistry, ServiceMetrics};
use crate::sim::Simulator;
use crate::store::EntityStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    metrics: Arc<ServiceMetrics>,
    sim: Simulator,
    cache: Cache,
    store: EntityStore,
    started_at: Instant,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        let registry = Arc::new(MetricRegistry::new());
        let metrics = Arc::new(ServiceMetrics::new(registry)?);

        let sim = Simulator::new(
            cfg.simulation.seed,
            cfg.simulation.latency_scale,
            Arc::clone(&metrics),
        );
        let cache = Cache::new(Arc::clone(&metrics));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics,
                sim,
                cache,
                store: EntityStore::new(),
                started_at: Instant::now(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn success_rates(&self) -> SuccessRates {
        self.inner.cfg.simulation.success
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn sim(&self) -> &Simulator {
        &self.inner.sim
    }

    pub fn cache(&self) -> &Cache {
        &self.inner.cache
    }

    pub fn store(&self) -> &EntityStore {
        &self.inner.store
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}
