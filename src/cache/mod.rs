//! FAQ list cache.
//!
//! One entry per language holds the full projected FAQ list under
//! `faqs:<lang>`. Entries expire after the configured TTL and every mutation
//! deletes all of them.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "redis"          # memory | redis | disabled
//! redis_url = "redis://127.0.0.1:6379"
//! ttl_seconds = 3600
//! memory_capacity = 64
//! ```

mod config;
mod keys;
mod lock;
mod redis_store;
mod store;

pub use config::{CacheBackend, CacheConfig};
pub use keys::FaqListKey;
pub use redis_store::RedisStore;
pub use store::{CacheError, CacheStore, MemoryStore, NullStore};
