//! Short-lived result cache that also de-duplicates in-flight loads.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    cell: Arc<OnceCell<V>>,
    /// `None` while the load is still running.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|t| t > now)
    }
}

/// Keyed cache with a fixed time-to-live.
///
/// The TTL starts when a load completes, so a slow or retried load is still
/// served for the full TTL. Concurrent loads of the same key share one
/// in-flight future. A failed load leaves nothing behind, so the next caller
/// starts fresh.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live cell for `key`, creating one if the old one expired.
    fn slot(&self, key: &K) -> Arc<OnceCell<V>> {
        let now = Instant::now();
        let mut entries = self.lock();
        if let Some(entry) = entries.get(key).filter(|e| e.is_live(now)) {
            debug!("cache hit");
            return Arc::clone(&entry.cell);
        }

        debug!("cache miss");
        entries.retain(|_, e| e.is_live(now));
        let cell = Arc::new(OnceCell::new());
        entries.insert(
            key.clone(),
            Entry {
                cell: Arc::clone(&cell),
                expires_at: None,
            },
        );
        cell
    }

    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.slot(&key);
        let result = cell.get_or_try_init(load).await.cloned();

        let mut entries = self.lock();
        // a newer load may already have replaced our entry
        let ours = entries
            .get(&key)
            .is_some_and(|entry| Arc::ptr_eq(&entry.cell, &cell));
        if ours {
            match &result {
                Ok(_) => {
                    if let Some(entry) = entries.get_mut(&key) {
                        entry.expires_at.get_or_insert_with(|| Instant::now() + self.ttl);
                    }
                }
                Err(_) => {
                    entries.remove(&key);
                }
            }
        }
        result
    }

    /// Cached value for `key`, if loaded and not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|e| e.expires_at.is_some_and(|t| t > now))
            .and_then(|e| e.cell.get().cloned())
    }

    pub fn invalidate(&self, key: &K) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drops expired entries. Loads still in flight are kept.
    pub fn prune(&self) {
        let now = Instant::now();
        self.lock().retain(|_, e| e.is_live(now));
    }

    /// Number of entries, expired ones included until the next prune.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
