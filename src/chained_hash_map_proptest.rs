#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can run
// the internal invariant check after every step.

use crate::chained_hash_map::{ChainedHashMap, Handle, InsertError};
use crate::hash::{positional_hash, sum_hash};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Insert(usize, i32),
    Remove(usize),
    RemoveHandle(usize),
    Get(usize),
    Contains(String),
    Resize(usize),
    Clear,
    Keys,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            2 => idx.clone().prop_map(OpI::Get),
            2 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (0usize..12).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Keys),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drive one map against a std HashMap model and check, after every step:
// - size parity, key-set parity and value parity;
// - `empty_buckets() + occupied buckets == capacity`;
// - `table_load() == size / capacity`;
// - live handles resolve to the model value, stale handles never resolve;
// - the map's own structural invariants.
fn run_model<H>(
    mut sut: ChainedHashMap<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: Fn(&str) -> u64,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let prev = sut.put(k.as_str(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k.as_str(), v) {
                    Ok(h) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k.clone(), v);
                        live.insert(k.clone(), h);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
            }
            OpI::RemoveHandle(i) => {
                let k = &pool[i];
                if let Some(h) = live.remove(k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert_eq!(&kk, k);
                    prop_assert_eq!(Some(vv), model.remove(k));
                    stale.push(h);
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Resize(n) => {
                let before = sut.capacity();
                sut.resize_table(n);
                let expected = if n < 1 { before } else { n };
                prop_assert_eq!(sut.capacity(), expected);
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
                prop_assert_eq!(sut.capacity(), cap);
            }
            OpI::Keys => {
                let keys = sut.get_keys();
                prop_assert_eq!(keys.len(), sut.size());
                let mut_keys: Vec<String> = sut.iter_mut().map(|(k, _)| k.to_string()).collect();
                prop_assert_eq!(&mut_keys, &keys);
                let s_keys: BTreeSet<_> = keys.into_iter().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let occupied = sut.chain_lengths().filter(|&n| n > 0).count();
        prop_assert_eq!(sut.empty_buckets() + occupied, sut.capacity());
        prop_assert_eq!(sut.table_load(), sut.size() as f64 / sut.capacity() as f64);
        for (k, h) in &live {
            prop_assert_eq!(h.value(&sut), model.get(k));
        }
        for h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        sut.check_invariants();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_sum_hash((pool, ops) in arb_scenario(), cap in 1usize..16) {
        run_model(ChainedHashMap::new(cap, sum_hash), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_positional_hash((pool, ops) in arb_scenario(), cap in 1usize..16) {
        run_model(ChainedHashMap::new(cap, positional_hash), &pool, ops)?;
    }

    // Worst case: every key collides into slot 0 regardless of capacity.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), cap in 1usize..16) {
        run_model(ChainedHashMap::new(cap, |_: &str| 0u64), &pool, ops)?;
    }

    // Resizing never changes membership or values.
    #[test]
    fn prop_resize_preserves_entries(
        entries in proptest::collection::hash_map("[a-z0-9]{0,6}", any::<i32>(), 0..40),
        caps in proptest::collection::vec(0usize..64, 1..6),
    ) {
        let mut m = ChainedHashMap::new(4, positional_hash);
        for (k, v) in &entries {
            m.put(k.as_str(), *v);
        }
        for cap in caps {
            m.resize_table(cap);
            prop_assert_eq!(m.size(), entries.len());
            for (k, v) in &entries {
                prop_assert_eq!(m.get(k), Some(v));
            }
        }
    }
}
