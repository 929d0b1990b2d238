//! Non-evicting key-value cache used to demonstrate hit/miss metrics.
//!
//! No TTL and no size bound; concurrent writers to the same key resolve as
//! last-writer-wins. Values are stored as JSON so any serializable response
//! can be cached verbatim.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::obs::ServiceMetrics;

/// Key holding the `GET /users` response body.
pub const ALL_USERS_KEY: &str = "all_users";

/// Per-user key. Never invalidated: users are immutable once created.
pub fn user_key(id: u64) -> String {
    format!("user_{id}")
}

pub struct Cache {
    entries: DashMap<String, Value>,
    metrics: Arc<ServiceMetrics>,
}

impl Cache {
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            entries: DashMap::new(),
            metrics,
        }
    }

    /// Look up `key`, counting a hit or miss under `cache_name`.
    pub fn get(&self, cache_name: &str, key: &str) -> Option<Value> {
        let found = self.entries.get(key).map(|v| v.value().clone());
        self.metrics.cache_lookup(cache_name, found.is_some());
        if found.is_some() {
            tracing::info!(cache_name, key, "cache hit");
        }
        found
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Drop `key`; returns whether an entry was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
