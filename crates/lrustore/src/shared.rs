//! Lock-guarded store handle for use from several threads

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Capacity;
use crate::error::Result;
use crate::stats::StoreStats;
use crate::store::{Entry, LruStore, Touch};

/// Cloneable handle to one [`LruStore`]
///
/// A single mutex covers the recency list and the index together, and is
/// held for the whole of each operation.
pub struct SharedStore<K, V = ()> {
    inner: Arc<Mutex<LruStore<K, V>>>,
}

impl<K, V> Clone for SharedStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> From<LruStore<K, V>> for SharedStore<K, V> {
    fn from(store: LruStore<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }
}

impl<K, V> SharedStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared store with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(LruStore::new(capacity)?.into())
    }

    /// Create a shared store from an already validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        LruStore::with_capacity(capacity).into()
    }

    /// See [`LruStore::touch`]
    pub fn touch(&self, key: K) -> Touch<K, V>
    where
        V: Default,
    {
        self.inner.lock().touch(key)
    }

    /// See [`LruStore::touch_with`]
    pub fn touch_with(&self, key: K, value: V) -> Touch<K, V> {
        self.inner.lock().touch_with(key, value)
    }

    /// Get a copy of the payload for `key`, promoting it
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key).cloned()
    }

    /// See [`LruStore::contains`]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// See [`LruStore::remove`]
    pub fn remove<Q>(&self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Keys from most to least recently used, copied out under the lock
    pub fn snapshot(&self) -> Vec<K> {
        self.inner.lock().snapshot().cloned().collect()
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Copy of the activity counters
    pub fn stats(&self) -> StoreStats {
        *self.inner.lock().stats()
    }

    /// Run `f` against the locked store
    pub fn with<R>(&self, f: impl FnOnce(&mut LruStore<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let store: SharedStore<&str> = SharedStore::new(2).unwrap();

        store.touch("a");
        store.touch("b");
        let touch = store.touch("c");

        assert_eq!(touch.evicted().map(|e| *e.key()), Some("a"));
        assert_eq!(store.snapshot(), vec!["c", "b"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn test_shared_clone_same_store() {
        let store: SharedStore<u32, String> = SharedStore::new(3).unwrap();
        let other = store.clone();

        other.touch_with(1, "one".to_string());
        assert_eq!(store.get(&1), Some("one".to_string()));
        assert!(store.remove(&1).is_some());
        assert!(other.is_empty());
    }

    #[test]
    fn test_shared_threads() {
        let store: SharedStore<u64> = SharedStore::new(16).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        store.touch(t * 1000 + i % 40);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 16);
        assert_eq!(store.stats().additions() + store.stats().relocations(), 2000);
        store.with(|inner| inner.check_invariants());
    }

    #[test]
    fn test_shared_invalid_capacity() {
        assert!(SharedStore::<u8>::new(0).is_err());
    }
}
