//! Snapshot-level key/value cache.
//!
//! This is the outer tier of caching: per-source caches inside the
//! market-data crate sit below it. Payloads are opaque bytes so any backing
//! store can implement [`SnapshotCache`].

mod cache_traits;
mod memory_cache;

pub use cache_traits::SnapshotCache;
pub use memory_cache::{CacheEntry, MemoryCache};

/// Cache key for one asset class.
pub fn cache_key(class: &str) -> String {
    format!("market_data:{}", class)
}
