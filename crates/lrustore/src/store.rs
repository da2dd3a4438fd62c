//! LRU store
//!
//! A recency list and a key index kept in lockstep. Every change to
//! membership goes through `attach` or `detach`, which update both halves
//! together; a relocation only relinks the list.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::Capacity;
use crate::error::Result;
use crate::list::{self, RecencyList};
use crate::stats::StoreStats;

/// Upper bound on slots reserved up front. Larger stores grow on demand.
const PREALLOC_LIMIT: usize = 4096;

/// Stable identity of a resident entry.
///
/// Survives moves to the front. Once the entry is evicted or removed the
/// id may be handed to a later entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(usize);

impl EntryId {
    /// Arena slot behind this id
    pub fn slot(self) -> usize {
        self.0
    }
}

/// Owned copy of a cached entry, detached from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V = ()> {
    id: EntryId,
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Identity of the entry while it was resident
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Cached key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Cached payload
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Split into key and payload
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// What a touch did to the touched key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Key was absent and has been inserted at the front
    Added,
    /// Key was resident and has been moved to the front
    Moved,
}

/// Result of a touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Touch<K, V = ()> {
    entry: Entry<K, V>,
    outcome: Outcome,
    evicted: Option<Entry<K, V>>,
}

impl<K, V> Touch<K, V> {
    /// The touched entry, now most recently used
    pub fn entry(&self) -> &Entry<K, V> {
        &self.entry
    }

    /// Whether the key was added or moved
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Entry pushed out by this touch, if capacity was exceeded
    pub fn evicted(&self) -> Option<&Entry<K, V>> {
        self.evicted.as_ref()
    }

    /// Split into the touched entry and the evicted one
    pub fn into_parts(self) -> (Entry<K, V>, Option<Entry<K, V>>) {
        (self.entry, self.evicted)
    }
}

/// Fixed-capacity LRU store
///
/// Holds at most `capacity` entries. Touching a new key when full evicts
/// the least recently used entry. `V` defaults to `()` for key-only use.
pub struct LruStore<K, V = ()> {
    index: HashMap<K, usize, RandomState>,
    list: RecencyList<K, V>,
    capacity: Capacity,
    stats: StoreStats,
}

impl<K, V> LruStore<K, V> {
    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Activity counters since construction or the last reset
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Reset activity counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Keys from most to least recently used.
    ///
    /// Does not promote anything. Call again, or clone the iterator, to
    /// walk the order a second time.
    pub fn snapshot(&self) -> Snapshot<'_, K, V> {
        Snapshot {
            inner: self.list.iter(),
        }
    }

    /// Key/payload pairs from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|(_, key, value)| (key, value))
    }

    /// Most recently used key
    pub fn mru(&self) -> Option<&K> {
        self.list.front().and_then(|idx| self.list.get(idx)).map(|(key, _)| key)
    }

    /// Least recently used key, the next to be evicted
    pub fn lru(&self) -> Option<&K> {
        self.list.back().and_then(|idx| self.list.get(idx)).map(|(key, _)| key)
    }
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create an empty store
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    /// Create an empty store from an already validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        let reserve = capacity.get().min(PREALLOC_LIMIT);

        Self {
            index: HashMap::with_capacity_and_hasher(reserve + 1, RandomState::new()),
            list: RecencyList::with_capacity(reserve),
            capacity,
            stats: StoreStats::new(),
        }
    }

    /// Record an access to `key`, inserting it with a default payload if absent.
    ///
    /// A resident key is moved to the front and keeps its payload and id.
    /// A new key is inserted at the front; if that takes the store over
    /// capacity the least recently used entry is evicted.
    pub fn touch(&mut self, key: K) -> Touch<K, V>
    where
        V: Default,
    {
        if let Some(idx) = self.index.get(&key).copied() {
            if let Some((_, value)) = self.list.get(idx) {
                let value = value.clone();
                return self.relocate(idx, key, value);
            }
        }
        self.insert(key, V::default())
    }

    /// Like [`touch`](Self::touch), but sets the payload.
    ///
    /// The payload of a resident key is replaced.
    pub fn touch_with(&mut self, key: K, value: V) -> Touch<K, V> {
        if let Some(idx) = self.index.get(&key).copied() {
            if let Some((_, slot)) = self.list.get_mut(idx) {
                *slot = value.clone();
                return self.relocate(idx, key, value);
            }
        }
        self.insert(key, value)
    }

    /// Get the payload for `key` and promote it. Absent keys are not inserted.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.list.move_to_front(idx);
        self.stats.record_relocation();
        self.list.get(idx).map(|(_, value)| value)
    }

    /// Get the payload for `key` without promoting it
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.list.get(idx).map(|(_, value)| value)
    }

    /// Check if `key` is resident, without promoting it
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove `key` regardless of capacity pressure
    ///
    /// # Returns
    /// * `Some(entry)` - the removed entry
    /// * `None` - the key was not resident
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        let entry = self.detach(idx)?;
        self.stats.record_removal();
        debug!(slot = idx, len = self.len(), "removed entry");
        Some(entry)
    }

    /// Drop every entry. Capacity and statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    fn relocate(&mut self, idx: usize, key: K, value: V) -> Touch<K, V> {
        self.list.move_to_front(idx);
        self.stats.record_relocation();
        trace!(slot = idx, "moved entry to front");

        Touch {
            entry: Entry {
                id: EntryId(idx),
                key,
                value,
            },
            outcome: Outcome::Moved,
            evicted: None,
        }
    }

    fn insert(&mut self, key: K, value: V) -> Touch<K, V> {
        let (entry_key, entry_value) = (key.clone(), value.clone());
        let idx = self.attach(key, value);
        self.stats.record_addition();
        trace!(slot = idx, len = self.len(), "added entry");

        let evicted = if self.len() > self.capacity.get() {
            self.evict()
        } else {
            None
        };

        Touch {
            entry: Entry {
                id: EntryId(idx),
                key: entry_key,
                value: entry_value,
            },
            outcome: Outcome::Added,
            evicted,
        }
    }

    fn evict(&mut self) -> Option<Entry<K, V>> {
        let idx = self.list.back()?;
        let entry = self.detach(idx)?;
        self.stats.record_eviction();
        debug!(
            slot = idx,
            capacity = self.capacity.get(),
            "evicted least recently used entry"
        );
        Some(entry)
    }

    /// Link a new entry at the front and index it.
    fn attach(&mut self, key: K, value: V) -> usize {
        let idx = self.list.push_front(key.clone(), value);
        self.index.insert(key, idx);
        idx
    }

    /// Unlink an entry and drop it from the index.
    fn detach(&mut self, idx: usize) -> Option<Entry<K, V>> {
        let (key, value) = self.list.release(idx)?;
        self.index.remove(&key);
        Some(Entry {
            id: EntryId(idx),
            key,
            value,
        })
    }

    /// Assert that the list and index agree and the size bound holds.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.list.is_doubly_consistent(), "recency list links broken");
        assert_eq!(self.index.len(), self.list.len(), "index and list sizes differ");
        assert!(self.list.len() <= self.capacity.get(), "over capacity");

        for (idx, key, _) in self.list.iter() {
            assert_eq!(self.index.get(key), Some(&idx), "index points at wrong slot");
        }
        assert_eq!(self.snapshot().count(), self.index.len());
    }
}

impl<K: fmt::Display, V> fmt::Display for LruStore<K, V> {
    /// Renders `3 - [{A}<-->{B}<-->{C}]`, most recently used first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - [", self.len())?;
        for (i, key) in self.snapshot().enumerate() {
            if i > 0 {
                f.write_str("<-->")?;
            }
            write!(f, "{{{}}}", key)?;
        }
        f.write_str("]")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity.get())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a LruStore<K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Keys of a store from most to least recently used
pub struct Snapshot<'a, K, V> {
    inner: list::Iter<'a, K, V>,
}

impl<K, V> Clone for Snapshot<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Snapshot<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Snapshot<'_, K, V> {}

impl<K, V> FusedIterator for Snapshot<'_, K, V> {}
