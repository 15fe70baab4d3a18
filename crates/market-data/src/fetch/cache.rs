//! Short-lived per-source caches.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

/// A `Mutex`-guarded map whose entries are fresh for `ttl` after insertion.
///
/// Stale entries are kept, not evicted: callers that need a last-known-good
/// value can still read them through [`get_within`](Self::get_within).
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Source cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Value for `key` if it was stored less than `ttl` ago.
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        self.get_within(key, self.ttl)
    }

    /// Value for `key` if it was stored less than `max_age` ago.
    pub fn get_within(&self, key: &K, max_age: Duration) -> Option<V> {
        let entries = self.lock_entries();
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < max_age)
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        self.lock_entries().insert(key, (Instant::now(), value));
    }

    /// Splits `keys` into fresh hits and keys that must be requested.
    pub fn partition<'a, I>(&self, keys: I) -> (HashMap<K, V>, Vec<K>)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let entries = self.lock_entries();
        let mut hits = HashMap::new();
        let mut misses = Vec::new();
        for key in keys {
            match entries.get(key) {
                Some((stored_at, value)) if stored_at.elapsed() < self.ttl => {
                    hits.insert(key.clone(), value.clone());
                }
                _ => misses.push(key.clone()),
            }
        }
        (hits, misses)
    }
}

/// Cache holding a single value.
pub type TtlSlot<V> = TtlCache<(), V>;
