//! Result caches
//!
//! The pipeline memoises whole batches and individual ring sequences behind
//! the [`CacheStore`] trait. [`LruStore`] is the default: a bounded map that
//! evicts the least recently used entry once it is full.

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracemill_core::Fingerprint;

/// Batches kept by a default pipeline.
pub const DEFAULT_BATCH_CAPACITY: usize = 16;

/// Ring sequences kept by a default pipeline.
pub const DEFAULT_RING_CAPACITY: usize = 256;

/// Fingerprint keyed store shared by pipeline runs.
pub trait CacheStore<V>: Send + Sync {
    fn get(&self, key: &Fingerprint) -> Option<V>;
    fn insert(&self, key: Fingerprint, value: V);
    fn len(&self) -> usize;
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Least recently used store; iteration order of the map is recency order.
#[derive(Debug)]
pub struct LruStore<V> {
    entries: Mutex<IndexMap<Fingerprint, V>>,
    capacity: usize,
}

impl<V> LruStore<V> {
    /// A store holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V: Clone + Send> CacheStore<V> for LruStore<V> {
    fn get(&self, key: &Fingerprint) -> Option<V> {
        let mut entries = self.entries.lock();
        let value = entries.shift_remove(key)?;
        entries.insert(*key, value.clone());
        Some(value)
    }

    fn insert(&self, key: Fingerprint, value: V) {
        let mut entries = self.entries.lock();
        entries.shift_remove(&key);
        while entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                tracing::debug!("Evicting cache entry {}", evicted);
            }
        }
        entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }
}
