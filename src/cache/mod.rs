//! In-memory memoization for resolution results
//!
//! One `ResolutionCache` per capability (geocode, search). Entries are never
//! mutated once written. The cache can be bounded (least-recently-used
//! eviction) and can expire entries after a TTL; `unbounded()` keeps every
//! entry for the lifetime of the owner.

pub mod inflight;

pub use inflight::InFlight;

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Bounds applied to a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheSettings {
    /// Maximum number of entries; `None` is unbounded
    pub max_entries: Option<usize>,
    /// Entry lifetime; `None` never expires
    pub ttl: Option<Duration>,
}

impl CacheSettings {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

struct CacheEntry<V> {
    value: V,
    inserted: Instant,
    last_used: u64,
}

struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    tick: u64,
}

/// Key/value memoization table
pub struct ResolutionCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    settings: CacheSettings,
}

impl<K, V> ResolutionCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache with the given bounds
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            settings,
        }
    }

    /// Create a cache that never evicts or expires
    pub fn unbounded() -> Self {
        Self::new(CacheSettings::unbounded())
    }

    /// Look up a key, dropping it first if it has expired
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().await;
        inner.tick += 1;
        let tick = inner.tick;

        let expired = match (inner.entries.get(key), self.settings.ttl) {
            (Some(entry), Some(ttl)) => entry.inserted.elapsed() >= ttl,
            _ => false,
        };
        if expired {
            inner.entries.remove(key);
            return None;
        }

        inner.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            entry.value.clone()
        })
    }

    /// Store a value, silently replacing any previous one
    pub async fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock().await;
        inner.tick += 1;
        let tick = inner.tick;

        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted: Instant::now(),
                last_used: tick,
            },
        );

        if let Some(max) = self.settings.max_entries {
            while inner.entries.len() > max {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        inner.entries.remove(&k);
                        debug!("Evicted least recently used cache entry");
                    }
                    None => break,
                }
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }
}

impl<K, V> Default for ResolutionCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::unbounded()
    }
}
