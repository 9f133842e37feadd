//! In-flight request de-duplication
//!
//! Concurrent callers asking for the same key share one pending computation
//! instead of each issuing a provider call. The pending slot is dropped once
//! the computation finishes, or its caller is dropped, so results that are
//! not cached (fallbacks) are recomputed on the next call.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

type Slots<K, V> = HashMap<K, Arc<OnceCell<V>>>;

/// Map of keys to pending computations
///
/// The map lock is never held across an await.
pub struct InFlight<K, V> {
    pending: Mutex<Slots<K, V>>,
}

/// Removes a key's slot when the caller that joined it finishes or is dropped
struct SlotGuard<'a, K: Eq + Hash, V> {
    pending: &'a Mutex<Slots<K, V>>,
    key: K,
    cell: Arc<OnceCell<V>>,
}

impl<K: Eq + Hash, V> Drop for SlotGuard<'_, K, V> {
    fn drop(&mut self) {
        let mut pending = lock(self.pending);
        if pending
            .get(&self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &self.cell))
        {
            pending.remove(&self.key);
        }
    }
}

fn lock<K, V>(pending: &Mutex<Slots<K, V>>) -> MutexGuard<'_, Slots<K, V>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<K, V> InFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Run `compute` for `key`, or join a computation already running for it
    pub async fn run<F, Fut>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = lock(&self.pending)
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let guard = SlotGuard {
            pending: &self.pending,
            key,
            cell,
        };
        let value = guard.cell.get_or_init(compute).await.clone();
        drop(guard);

        value
    }

    /// Number of keys with a computation currently running
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl<K, V> Default for InFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
