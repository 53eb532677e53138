//! Hash functions and slot reduction.
//!
//! The table never judges hash quality. It only reduces whatever the
//! function returns modulo the current capacity, so any `Fn(&str) -> u64`
//! works, including constant functions that collide every key.

/// Plain function pointer accepted by `ChainedHashMap` by default.
pub type HashFn = fn(&str) -> u64;

/// Sum of the character codes of `key`.
///
/// Anagrams collide: `sum_hash("abc") == sum_hash("cba")`.
///
/// ```
/// use chain_hashmap::hash::sum_hash;
///
/// assert_eq!(sum_hash("key1"), 378);
/// assert_eq!(sum_hash(""), 0);
/// ```
pub fn sum_hash(key: &str) -> u64 {
    key.chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)))
}

/// Sum of character codes, each weighted by its 1-based position.
///
/// ```
/// use chain_hashmap::hash::positional_hash;
///
/// assert_eq!(positional_hash("key1"), 868);
/// assert_ne!(positional_hash("abc"), positional_hash("cba"));
/// ```
pub fn positional_hash(key: &str) -> u64 {
    key.chars().zip(1u64..).fold(0u64, |acc, (c, pos)| {
        acc.wrapping_add(pos.wrapping_mul(u64::from(c)))
    })
}

/// Reduce a hash to a bucket index in `[0, capacity)`.
#[inline]
pub(crate) fn slot_of(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "slot reduction needs at least one bucket");
    (hash % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        assert_eq!(sum_hash("a"), 97);
        assert_eq!(positional_hash("a"), 97);
        assert_eq!(sum_hash("str0"), 393);
        assert_eq!(positional_hash("str0"), 881);
        assert_eq!(sum_hash("abc"), 294);
        assert_eq!(positional_hash("abc"), 590);
        assert_eq!(positional_hash("cba"), 586);
    }

    #[test]
    fn empty_key_hashes_to_zero() {
        assert_eq!(sum_hash(""), 0);
        assert_eq!(positional_hash(""), 0);
    }

    /// Invariant: reduction always lands inside the bucket array, including
    /// for hashes near the top of the `u64` range.
    #[test]
    fn slot_stays_in_range() {
        for cap in [1usize, 2, 3, 7, 64, 1000] {
            for h in [0u64, 1, 12345, u64::MAX - 1, u64::MAX] {
                assert!(slot_of(h, cap) < cap);
            }
        }
        assert_eq!(slot_of(378, 100), 78);
        assert_eq!(slot_of(u64::MAX, 1), 0);
    }

    #[test]
    fn non_ascii_uses_scalar_values() {
        // 'é' is U+00E9.
        assert_eq!(sum_hash("é"), 0xE9);
        assert_eq!(positional_hash("aé"), 97 + 2 * 0xE9);
    }
}
