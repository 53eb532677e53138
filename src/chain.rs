//! Chain: the ordered run of entries that share one bucket.
//!
//! Entries themselves live in the map's generational arena; a chain only
//! holds their arena keys ("links"). That keeps a resize down to moving
//! links between chains, while every entry is still reachable from exactly
//! one chain.

use core::mem;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
}

/// Entry storage shared by every chain of one map.
pub(crate) type Slots<V> = SlotMap<DefaultKey, Entry<V>>;

#[derive(Debug)]
pub(crate) struct Chain {
    links: Vec<DefaultKey>,
}

impl Chain {
    pub(crate) const fn new() -> Self {
        Self { links: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in chain order.
    pub(crate) fn links(&self) -> &[DefaultKey] {
        &self.links
    }

    fn position<V>(&self, slots: &Slots<V>, key: &str) -> Option<usize> {
        self.links
            .iter()
            .position(|&link| slots.get(link).is_some_and(|e| e.key == key))
    }

    /// Exhaustive scan for `key`; no ordering is assumed.
    pub(crate) fn find<V>(&self, slots: &Slots<V>, key: &str) -> Option<DefaultKey> {
        self.position(slots, key).map(|pos| self.links[pos])
    }

    /// Append a fresh entry. The caller has already established that `key`
    /// is absent from this chain.
    pub(crate) fn insert_new<V>(
        &mut self,
        slots: &mut Slots<V>,
        key: String,
        value: V,
    ) -> DefaultKey {
        debug_assert!(
            self.find(slots, &key).is_none(),
            "insert_new on a chain that already holds the key"
        );
        let link = slots.insert(Entry { key, value });
        self.links.push(link);
        link
    }

    /// Replace the value stored under `key` in place.
    ///
    /// Returns the previous value, or hands `value` back untouched when the
    /// key is not in this chain.
    pub(crate) fn update<V>(&self, slots: &mut Slots<V>, key: &str, value: V) -> Result<V, V> {
        match self.find(slots, key).and_then(|link| slots.get_mut(link)) {
            Some(entry) => Ok(mem::replace(&mut entry.value, value)),
            None => Err(value),
        }
    }

    /// Delete the entry for `key`, keeping the relative order of the rest.
    pub(crate) fn remove<V>(&mut self, slots: &mut Slots<V>, key: &str) -> Option<Entry<V>> {
        let pos = self.position(slots, key)?;
        let link = self.links.remove(pos);
        slots.remove(link)
    }

    /// Take over an entry that already lives in the arena (used by rehash).
    pub(crate) fn push_link(&mut self, link: DefaultKey) {
        self.links.push(link);
    }

    /// Drop `link` from the chain without touching the arena.
    pub(crate) fn unlink(&mut self, link: DefaultKey) -> bool {
        match self.links.iter().position(|&l| l == link) {
            Some(pos) => {
                self.links.remove(pos);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of(chain: &Chain, slots: &Slots<i32>) -> Vec<String> {
        chain
            .links()
            .iter()
            .map(|&l| slots[l].key.clone())
            .collect()
    }

    /// Invariant: `find` returns the link of the matching entry and `None`
    /// for keys the chain does not hold.
    #[test]
    fn find_hits_and_misses() {
        let mut slots = Slots::new();
        let mut c = Chain::new();
        let a = c.insert_new(&mut slots, "a".to_string(), 1);
        let b = c.insert_new(&mut slots, "b".to_string(), 2);
        assert_eq!(c.find(&slots, "a"), Some(a));
        assert_eq!(c.find(&slots, "b"), Some(b));
        assert_eq!(c.find(&slots, "c"), None);
        assert_eq!(c.len(), 2);
    }

    /// Invariant: `update` replaces in place and reports the old value; on a
    /// miss the value comes back and nothing changes.
    #[test]
    fn update_in_place_or_hand_back() {
        let mut slots = Slots::new();
        let mut c = Chain::new();
        c.insert_new(&mut slots, "k".to_string(), 10);

        assert_eq!(c.update(&mut slots, "k", 20), Ok(10));
        let link = c.find(&slots, "k").unwrap();
        assert_eq!(slots[link].value, 20);

        assert_eq!(c.update(&mut slots, "missing", 99), Err(99));
        assert_eq!(c.len(), 1);
        assert_eq!(slots.len(), 1);
    }

    /// Invariant: `remove` deletes from both chain and arena, keeps the
    /// order of the survivors, and is a no-op for absent keys.
    #[test]
    fn remove_preserves_order() {
        let mut slots = Slots::new();
        let mut c = Chain::new();
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            c.insert_new(&mut slots, (*k).to_string(), i as i32);
        }

        let removed = c.remove(&mut slots, "b").expect("present");
        assert_eq!(removed.key, "b");
        assert_eq!(removed.value, 1);
        assert_eq!(keys_of(&c, &slots), ["a", "c", "d"]);
        assert_eq!(slots.len(), 3);

        assert!(c.remove(&mut slots, "b").is_none());
        assert!(c.remove(&mut slots, "zzz").is_none());
        assert_eq!(c.len(), 3);
    }

    /// Invariant: links moved between chains keep pointing at the same
    /// arena entries; `unlink` leaves the arena alone.
    #[test]
    fn push_link_and_unlink() {
        let mut slots = Slots::new();
        let mut from = Chain::new();
        let mut to = Chain::new();
        let link = from.insert_new(&mut slots, "x".to_string(), 7);

        assert!(from.unlink(link));
        assert!(!from.unlink(link));
        assert!(from.is_empty());
        to.push_link(link);

        assert_eq!(to.find(&slots, "x"), Some(link));
        assert_eq!(slots[link].value, 7);
        assert_eq!(slots.len(), 1);
    }
}
