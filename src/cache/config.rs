//! Cache configuration.
//!
//! Selects the FAQ list cache backend and its expiry via `polyfaq.toml`.

use std::{num::NonZeroUsize, time::Duration};

use serde::Deserialize;

const DEFAULT_TTL_SECS: u64 = 3600;
const DEFAULT_MEMORY_CAPACITY: usize = 64;

/// Where cached FAQ lists live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process LRU map with per-entry expiry.
    Memory,
    /// Shared Redis instance.
    Redis,
    /// Every read is a miss and every write is dropped.
    Disabled,
}

/// Cache configuration resolved from settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Lifetime of a cached FAQ list.
    pub ttl: Duration,
    /// Maximum number of keys held by the memory backend.
    pub memory_capacity: usize,
    /// Connection URL for the Redis backend.
    pub redis_url: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            redis_url: None,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            backend: settings.backend,
            ttl: settings.ttl,
            memory_capacity: settings.memory_capacity.get(),
            redis_url: settings.redis_url.clone(),
        }
    }
}

impl CacheConfig {
    /// Returns the memory capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
