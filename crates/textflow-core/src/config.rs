//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial capacity of a broadcast connector's replay buffer. The buffer
    /// still grows without bound while any branch lags; this only sizes the
    /// first allocation.
    pub buffer_capacity: usize,

    /// How many compiled label patterns a matcher keeps before resetting its
    /// cache. Labeled patterns recompile per tuple, so repeated label values
    /// hit this cache.
    pub pattern_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1024,
            pattern_cache_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TEXTFLOW_BUFFER_CAPACITY`: connector replay-buffer initial capacity
    /// - `TEXTFLOW_PATTERN_CACHE_CAPACITY`: compiled-pattern cache capacity
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TEXTFLOW_BUFFER_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer_capacity = v;
            }
        }

        if let Ok(s) = std::env::var("TEXTFLOW_PATTERN_CACHE_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.pattern_cache_capacity = v;
            }
        }

        cfg
    }
}
