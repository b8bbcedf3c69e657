use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::clock::ClockExt;
use crate::consts::DEFAULT_CACHE_TTL;

struct Entry {
    value: Value,
    stored_at: f64
}

/// Fixed-TTL response cache
///
/// Entries expire lazily: an expired entry is discovered and removed
/// on the next lookup, there is no eviction thread and no size bound.
/// Intended for low-volume polling workloads
pub struct Cache {
    ttl: Duration,
    entries: HashMap<String, Entry>,
    clock: Arc<dyn ClockExt>
}

impl Cache {
    pub fn new(clock: Arc<dyn ClockExt>) -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL, clock)
    }

    pub fn with_ttl(ttl: Duration, clock: Arc<dyn ClockExt>) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            clock
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a cached value
    ///
    /// Returns `None` if the key is absent or its entry is older
    /// than the TTL. An expired entry is removed by the lookup
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;

        if self.clock.now() - entry.stored_at < self.ttl.as_secs_f64() {
            return Some(entry.value.clone());
        }

        tracing::debug!(key, "Cache entry expired");

        self.entries.remove(key);

        None
    }

    /// Store a value, overwriting any previous entry for the key
    pub fn set(&mut self, key: impl ToString, value: Value) {
        self.entries.insert(key.to_string(), Entry {
            value,
            stored_at: self.clock.now()
        });
    }
}
