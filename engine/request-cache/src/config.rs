//! Configuration for the request cache

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default entry lifetime (12 hours)
pub const DEFAULT_TTL_SECS: u64 = 12 * 60 * 60;

/// Default capacity before the oldest entries are evicted
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of entries stored without an explicit expiry
    pub default_ttl_secs: u64,

    /// Maximum stored entries (0 = unbounded)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { default_ttl_secs: DEFAULT_TTL_SECS, max_entries: DEFAULT_MAX_ENTRIES }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}
