//! ChainedHashMap: fixed bucket array, separate chaining, caller-driven rehash.

use crate::chain::{Chain, Entry, Slots};
use crate::hash::{slot_of, HashFn};
use core::fmt;
use core::iter::FusedIterator;
use hashbrown::HashMap;
use slotmap::DefaultKey;
use thiserror::Error;

/// Stable reference to one entry.
///
/// A handle survives `resize_table` (entries never move in the arena) and
/// stops resolving once its entry is removed or the map is cleared. Slots
/// are generational, so a stale handle never aliases a newer entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, V, H>(&self, map: &'a ChainedHashMap<V, H>) -> Option<&'a str> {
        map.slots.get(self.0).map(|e| e.key.as_str())
    }

    pub fn value<'a, V, H>(&self, map: &'a ChainedHashMap<V, H>) -> Option<&'a V> {
        map.slots.get(self.0).map(|e| &e.value)
    }

    pub fn value_mut<'a, V, H>(&self, map: &'a mut ChainedHashMap<V, H>) -> Option<&'a mut V> {
        map.slots.get_mut(self.0).map(|e| &mut e.value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    #[error("key is already present")]
    DuplicateKey,
}

/// Hash map over `String` keys with one chain per bucket.
///
/// Every keyed operation hashes the key with the user-supplied function and
/// reduces it modulo the current capacity. The map never grows on its own:
/// the load factor is unbounded until the caller invokes
/// [`resize_table`](Self::resize_table).
///
/// ```
/// use chain_hashmap::{hash::sum_hash, ChainedHashMap};
///
/// let mut m = ChainedHashMap::new(5, sum_hash);
/// m.put("a", 1);
/// m.put("b", 2);
/// m.put("a", 3);
/// assert_eq!(m.size(), 2);
/// assert_eq!(m.get("a"), Some(&3));
///
/// m.resize_table(16);
/// assert_eq!(m.capacity(), 16);
/// assert_eq!(m.get("b"), Some(&2));
/// ```
pub struct ChainedHashMap<V, H = HashFn> {
    slots: Slots<V>,     // entry arena; chains hold its keys
    buckets: Vec<Chain>, // len == capacity, always >= 1
    hash_function: H,
}

fn empty_chains(n: usize) -> Vec<Chain> {
    core::iter::repeat_with(Chain::new).take(n).collect()
}

impl<V, H> ChainedHashMap<V, H>
where
    H: Fn(&str) -> u64,
{
    /// Create a map with `capacity` empty buckets. A capacity of zero is
    /// bumped to one so slot reduction is always defined.
    pub fn new(capacity: usize, hash_function: H) -> Self {
        Self {
            slots: Slots::new(),
            buckets: empty_chains(capacity.max(1)),
            hash_function,
        }
    }

    #[inline]
    fn slot(&self, key: &str) -> usize {
        slot_of((self.hash_function)(key), self.buckets.len())
    }

    fn link_of(&self, key: &str) -> Option<DefaultKey> {
        self.buckets[self.slot(key)].find(&self.slots, key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let link = self.link_of(key)?;
        self.slots.get(link).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let link = self.link_of(key)?;
        self.slots.get_mut(link).map(|e| &mut e.value)
    }

    /// An empty map answers `false` without hashing.
    pub fn contains_key(&self, key: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        self.link_of(key).is_some()
    }

    /// Insert or overwrite. Returns the replaced value when `key` was
    /// already present; `size` only grows for new keys.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let slot = self.slot(&key);
        let chain = &mut self.buckets[slot];
        match chain.update(&mut self.slots, &key, value) {
            Ok(old) => Some(old),
            Err(value) => {
                chain.insert_new(&mut self.slots, key, value);
                None
            }
        }
    }

    /// Insert only if `key` is absent, returning a handle to the new entry.
    /// On a duplicate the map is left untouched.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Handle, InsertError> {
        let key = key.into();
        let slot = self.slot(&key);
        let chain = &mut self.buckets[slot];
        if chain.find(&self.slots, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        Ok(Handle::new(chain.insert_new(&mut self.slots, key, value)))
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        self.link_of(key).map(Handle::new)
    }

    /// Remove `key`, handing back its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let slot = self.slot(key);
        self.buckets[slot]
            .remove(&mut self.slots, key)
            .map(|e| e.value)
    }

    /// Remove the entry behind `handle`; `None` if the handle is stale.
    pub fn remove_handle(&mut self, handle: Handle) -> Option<(String, V)> {
        let link = handle.raw_handle();
        let slot = self.slot(&self.slots.get(link)?.key);
        let unlinked = self.buckets[slot].unlink(link);
        debug_assert!(unlinked, "live entry missing from its home chain");
        let entry = self.slots.remove(link)?;
        Some((entry.key, entry.value))
    }

    /// Drop every entry. Capacity is unchanged and only occupied buckets
    /// are replaced.
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut().filter(|c| !c.is_empty()) {
            *chain = Chain::new();
        }
        self.slots.clear();
        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    /// Rebuild the bucket array with `new_capacity` buckets, rehashing every
    /// key under the new modulus. Zero is silently ignored.
    ///
    /// The new array is fully built before it replaces the old one, so a
    /// panicking hash function leaves the map as it was.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }
        let mut fresh = empty_chains(new_capacity);
        for chain in &self.buckets {
            for &link in chain.links() {
                let Some(entry) = self.slots.get(link) else {
                    debug_assert!(false, "chain link without an entry");
                    continue;
                };
                let slot = slot_of((self.hash_function)(&entry.key), new_capacity);
                fresh[slot].push_link(link);
            }
        }
        self.buckets = fresh;
        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    /// Structural self-check: size bookkeeping, home-slot placement and
    /// global key uniqueness. Panics on the first violation.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn check_invariants(&self) {
        use hashbrown::HashSet;

        assert!(!self.buckets.is_empty(), "bucket array must not be empty");
        let chained: usize = self.buckets.iter().map(Chain::len).sum();
        assert_eq!(chained, self.slots.len(), "size out of sync with chains");

        let mut seen = HashSet::with_capacity(chained);
        for (slot, chain) in self.buckets.iter().enumerate() {
            for &link in chain.links() {
                let entry = self
                    .slots
                    .get(link)
                    .expect("every chain link resolves to a live entry");
                assert_eq!(
                    self.slot(&entry.key),
                    slot,
                    "key {:?} outside its home bucket",
                    entry.key
                );
                assert!(seen.insert(entry.key.as_str()), "duplicate key {:?}", entry.key);
            }
        }
    }
}

impl<V, H> ChainedHashMap<V, H> {
    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.slots.len()
    }
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `size / capacity`.
    pub fn table_load(&self) -> f64 {
        let capacity = self.buckets.len();
        if capacity == 0 {
            return 0.0;
        }
        self.slots.len() as f64 / capacity as f64
    }

    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|c| c.is_empty()).count()
    }

    /// Chain length per bucket, in bucket order.
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Chain::len)
    }

    /// All keys, bucket by bucket and chain order within a bucket.
    pub fn get_keys(&self) -> Vec<String> {
        self.keys().map(str::to_owned).collect()
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Entries in bucket-then-chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.slots,
            buckets: self.buckets.iter(),
            links: Default::default(),
            remaining: self.slots.len(),
        }
    }

    /// Mutable access to every value, in the same bucket-then-chain order
    /// as [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        let order: HashMap<DefaultKey, usize> = self
            .buckets
            .iter()
            .flat_map(|c| c.links().iter().copied())
            .enumerate()
            .map(|(pos, link)| (link, pos))
            .collect();
        let mut entries: Vec<_> = self.slots.iter_mut().collect();
        entries.sort_unstable_by_key(|(link, _)| {
            order.get(link).copied().unwrap_or(usize::MAX)
        });
        IterMut {
            it: entries.into_iter(),
        }
    }
}

impl<V, H> fmt::Debug for ChainedHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// One line per bucket: `index: (key: value) -> (key: value)`.
impl<V: fmt::Display, H> fmt::Display for ChainedHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.buckets.iter().enumerate() {
            write!(f, "{i}: ")?;
            let entries = chain.links().iter().filter_map(|&l| self.slots.get(l));
            for (n, e) in entries.enumerate() {
                if n > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "({}: {})", e.key, e.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over `(key, &value)` in bucket-then-chain order.
pub struct Iter<'a, V> {
    slots: &'a Slots<V>,
    buckets: core::slice::Iter<'a, Chain>,
    links: core::slice::Iter<'a, DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&link) = self.links.next() {
                if let Some(e) = self.slots.get(link) {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((e.key.as_str(), &e.value));
                }
                continue;
            }
            self.links = self.buckets.next()?.links().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over keys in bucket-then-chain order.
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// Iterator over `(key, &mut value)`.
pub struct IterMut<'a, V> {
    it: std::vec::IntoIter<(DefaultKey, &'a mut Entry<V>)>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key.as_str(), &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<'a, V, H> IntoIterator for &'a ChainedHashMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
