use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;

use super::cache_traits::SnapshotCache;
use crate::errors::Result;

/// One stored payload.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.to_std().is_ok_and(|age| age >= self.ttl)
    }
}

/// In-process [`SnapshotCache`] over a `DashMap`.
///
/// Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SnapshotCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Utc::now();
        let hit = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.payload.clone());

        if hit.is_none() && self.entries.remove_if(key, |_, e| e.is_expired(now)).is_some() {
            debug!("Evicted expired cache entry {}", key);
        }
        Ok(hit)
    }

    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                payload,
                fetched_at: Utc::now(),
                ttl,
            },
        );
        Ok(())
    }
}
