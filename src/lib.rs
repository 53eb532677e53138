//! chain-hashmap: a single-threaded, separate-chaining hash map with an
//! explicit, caller-driven rehash, plus a companion binary min-heap.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose cost model is visible. The load factor is
//!   reported, never acted upon; growth happens only when the caller asks
//!   via `resize_table`.
//! - Layers:
//!   - `hash`: the hash function type plus two reference functions
//!     (`sum_hash`, `positional_hash`) and slot reduction.
//!   - `Chain`: one bucket's ordered run of entry links with
//!     find / insert-new / update / remove.
//!   - `ChainedHashMap<V, H>`: owns the entry arena, the bucket array
//!     (one `Chain` per slot) and the hash function; implements every
//!     public operation by routing through the chain at
//!     `hash(key) % capacity`.
//!
//! Constraints
//! - Single-threaded; no interior mutability, every mutation goes through
//!   `&mut self`.
//! - Keys are `String`s, hashed by a user-supplied `Fn(&str) -> u64`; the
//!   map only reduces the result modulo the current capacity.
//! - `capacity >= 1` at all times; `resize_table(0)` is a silent no-op.
//! - Missing keys are `None`, never an error.
//!
//! Storage
//! - Entries live in a generational `SlotMap`. A chain stores slot keys,
//!   so an entry is owned by the arena and reachable from exactly one
//!   chain. Slot keys double as public `Handle`s.
//! - Resize builds a complete new bucket array, re-running the hash
//!   function for every key under the new modulus, then swaps it in. The
//!   arena is untouched, so handles survive a resize; a panicking hash
//!   function leaves the old array in place.
//!
//! Debug checks
//! - In debug builds `clear` and `resize_table` verify the structural
//!   invariants (size bookkeeping, home-bucket placement, key uniqueness)
//!   and panic on violation. Release builds compile the check out.
//!
//! Notes and non-goals
//! - No automatic resizing, no persistence, no thread safety.
//! - `MinHeap` is independent of the map; it is kept here because both
//!   grew up together.

mod chain;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod hash;
pub mod min_heap;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Handle, InsertError};
pub use hash::HashFn;
pub use min_heap::{MinHeap, MinHeapError};
