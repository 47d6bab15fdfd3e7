use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// A key/value cache the engine memoizes fetched definitions in.
///
/// Values are stored forever; there is no expiry. Implementations must be
/// safe to share between threads.
pub trait Cache<V: Clone>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    fn put(&self, key: &str, value: V);

    /// Removes a key, returning its value.
    fn forget(&self, key: &str) -> Option<V>;

    /// Returns the cached value for `key`, or runs `producer` and caches its
    /// result. A `None` from the producer is returned but not cached.
    fn remember_forever(&self, key: &str, producer: &dyn Fn() -> Option<V>) -> Option<V> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        let value = producer()?;
        self.put(key, value.clone());
        Some(value)
    }
}

/// In-process [`Cache`] over a `HashMap`.
///
/// `remember_forever` serializes producers per key, so concurrent callers
/// asking for the same missing key run the producer once. The map itself is
/// never locked while a producer runs; reads of other keys do not wait.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
    producing: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            producing: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The lock serializing producers of `key`.
    fn producer_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut producing = self.producing.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(producing.entry(key.to_string()).or_default())
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: V) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn forget(&self, key: &str) -> Option<V> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    fn remember_forever(&self, key: &str, producer: &dyn Fn() -> Option<V>) -> Option<V> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }

        let slot = self.producer_lock(key);
        let _producing = slot.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have produced the value while we waited.
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        let produced = producer();
        if let Some(value) = &produced {
            self.put(key, value.clone());
        }
        self.producing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        produced
    }
}
