//! Frequency buckets for LFU tracking.
//!
//! Stores values in a [`HandleArena`] and files every live entry under the
//! bucket matching its access frequency. Buckets are linked in ascending
//! frequency order and `min_freq` points at the lowest non-empty one.
//!
//! Every entry carries the sequence number it was inserted with. A bucket
//! orders its members by that number, so among entries with equal frequency
//! the oldest insertion is always the eviction candidate, regardless of the
//! order in which they were touched.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                      FrequencyBuckets<T> Layout                             │
//! │                                                                             │
//! │   entries: HandleArena<Entry<T>>                                            │
//! │   ┌────────┬──────────────────────────────┐                                 │
//! │   │ Handle │ Entry                        │                                 │
//! │   ├────────┼──────────────────────────────┤                                 │
//! │   │  h_0   │ freq:2, seq:0, value         │                                 │
//! │   │  h_1   │ freq:1, seq:1, value         │                                 │
//! │   │  h_2   │ freq:1, seq:2, value         │                                 │
//! │   └────────┴──────────────────────────────┘                                 │
//! │                                                                             │
//! │   buckets: FxHashMap<u64, Bucket>  (frequency → seq-ordered members)        │
//! │                                                                             │
//! │   min_freq = 1                                                              │
//! │       │                                                                     │
//! │       ▼                                                                     │
//! │   freq=1: { 1: h_1, 2: h_2 }   (evict lowest seq)                           │
//! │   freq=2: { 0: h_0 }                                                        │
//! │                                                                             │
//! │   Bucket links: freq=1 ──next──► freq=2                                     │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time     | Notes                                        |
//! |-------------|----------|----------------------------------------------|
//! | `insert`    | O(log b) | New entry starts at freq=1 with the next seq |
//! | `touch`     | O(log b) | Moves entry to bucket `freq + 1`, same seq   |
//! | `remove`    | O(log b) | Leaves its bucket, then frees the slot       |
//! | `pop_min`   | O(log b) | Lowest seq of the `min_freq` bucket          |
//! | `iter_ids`  | O(n)     | Eviction order: ascending freq, then seq     |
//!
//! `b` is the size of the bucket involved.
use std::collections::BTreeMap;
use std::collections::btree_map;

use rustc_hash::FxHashMap;

use crate::ds::handle_arena::{Handle, HandleArena};
use crate::error::PolicyError;

#[derive(Debug, Clone)]
struct Entry<T> {
    freq: u64,
    seq: u64,
    value: T,
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    members: BTreeMap<u64, Handle>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Default bucket pre-allocation. Most entries cluster at low frequencies.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// Handle-addressed LFU tracker; ties go to the oldest insertion.
///
/// # Example
///
/// ```
/// use evictkit::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// let a = freq.insert("a").unwrap();
/// let b = freq.insert("b").unwrap();
/// freq.touch(b).unwrap();
/// freq.touch(a).unwrap();
///
/// assert_eq!(freq.frequency(a), Ok(2));
/// assert_eq!(freq.pop_min(), Some(("a", 2)));
/// assert_eq!(freq.pop_min(), Some(("b", 2)));
/// assert_eq!(freq.pop_min(), None);
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyBuckets<T> {
    entries: HandleArena<Entry<T>>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
    next_seq: u64,
}

impl<T> FrequencyBuckets<T> {
    /// Creates an empty, unbounded tracker.
    pub fn new() -> Self {
        Self::from_arena(HandleArena::new())
    }

    /// Creates an empty tracker with reserved entry capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(HandleArena::with_capacity(capacity))
    }

    /// Creates an empty tracker that refuses inserts beyond `limit` entries.
    pub fn bounded(limit: usize) -> Self {
        Self::from_arena(HandleArena::bounded(limit))
    }

    fn from_arena(entries: HandleArena<Entry<T>>) -> Self {
        Self {
            entries,
            buckets: FxHashMap::with_capacity_and_hasher(
                DEFAULT_BUCKET_PREALLOC,
                Default::default(),
            ),
            min_freq: 0,
            next_seq: 0,
        }
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` addresses a live entry.
    pub fn contains(&self, id: Handle) -> bool {
        self.entries.contains(id)
    }

    /// Returns the lowest frequency present, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq > 0).then_some(self.min_freq)
    }

    /// Current access count of `id`.
    pub fn frequency(&self, id: Handle) -> Result<u64, PolicyError> {
        self.entries.get(id).map(|entry| entry.freq)
    }

    pub fn get(&self, id: Handle) -> Result<&T, PolicyError> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, id: Handle) -> Result<&mut T, PolicyError> {
        self.entries.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Handle of the next eviction candidate.
    pub fn peek_min(&self) -> Option<Handle> {
        self.buckets
            .get(&self.min_freq)?
            .members
            .first_key_value()
            .map(|(_, &id)| id)
    }

    /// Inserts `value` at frequency 1; hands it back when at the limit.
    pub fn insert(&mut self, value: T) -> Result<Handle, T> {
        let seq = self.next_seq;
        let id = self
            .entries
            .try_insert(Entry {
                freq: 1,
                seq,
                value,
            })
            .map_err(|entry| entry.value)?;
        self.next_seq += 1;

        if !self.buckets.contains_key(&1) {
            let next = (self.min_freq != 0).then_some(self.min_freq);
            self.insert_bucket(1, None, next);
        }
        self.file(1, seq, id);
        self.min_freq = 1;
        Ok(id)
    }

    /// Increments the frequency of `id` and returns the new value.
    ///
    /// The entry keeps its insertion sequence, so it lands in the new bucket
    /// behind every older entry already there. Frequencies saturate at
    /// `u64::MAX`.
    pub fn touch(&mut self, id: Handle) -> Result<u64, PolicyError> {
        let (current_freq, seq) = self
            .entries
            .get(id)
            .map(|entry| (entry.freq, entry.seq))?;
        if current_freq == u64::MAX {
            return Ok(current_freq);
        }
        let next_freq = current_freq + 1;

        let (prev_freq, next_existing) = self
            .buckets
            .get(&current_freq)
            .map(|bucket| (bucket.prev, bucket.next))
            .ok_or_else(|| id.invalid())?;

        self.unfile(current_freq, seq);
        let bucket_empty = self.bucket_is_empty(current_freq);
        if bucket_empty {
            self.remove_bucket(current_freq, prev_freq, next_existing);
            if self.min_freq == current_freq {
                self.min_freq = next_existing.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if bucket_empty {
                prev_freq
            } else {
                Some(current_freq)
            };
            self.insert_bucket(next_freq, prev, next_existing);
        }

        self.entries.get_mut(id)?.freq = next_freq;
        self.file(next_freq, seq, id);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }
        Ok(next_freq)
    }

    /// Takes `id` out of its bucket, frees its slot and returns the value.
    pub fn remove(&mut self, id: Handle) -> Result<T, PolicyError> {
        let (freq, seq) = self.entries.get(id).map(|entry| (entry.freq, entry.seq))?;
        self.unlink(freq, seq);
        self.entries.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the eviction candidate with its frequency.
    pub fn pop_min(&mut self) -> Option<(T, u64)> {
        let id = self.peek_min()?;
        let freq = self.min_freq;
        self.remove(id).ok().map(|value| (value, freq))
    }

    /// Returns handles in eviction order.
    pub fn iter_ids(&self) -> impl Iterator<Item = Handle> + '_ {
        let mut bucket = self.min_freq().and_then(|f| self.buckets.get(&f));
        let mut members: Option<btree_map::Values<'_, u64, Handle>> =
            bucket.map(|b| b.members.values());
        std::iter::from_fn(move || {
            loop {
                if let Some(&id) = members.as_mut().and_then(|m| m.next()) {
                    return Some(id);
                }
                let next = bucket?.next?;
                bucket = self.buckets.get(&next);
                members = bucket.map(|b| b.members.values());
            }
        })
    }

    /// Drops every entry; outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.clear();
        self.min_freq = 0;
        self.next_seq = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);
        assert!(self.buckets.contains_key(&self.min_freq));

        let mut total = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(!bucket.members.is_empty());
            if let Some(prev) = bucket.prev {
                assert!(prev < freq);
                assert_eq!(self.buckets[&prev].next, Some(freq));
            } else {
                assert_eq!(self.min_freq, freq);
            }
            if let Some(next) = bucket.next {
                assert!(next > freq);
                assert_eq!(self.buckets[&next].prev, Some(freq));
            }

            for (&seq, &id) in &bucket.members {
                let entry = self.entries.get(id).expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.seq, seq);
                assert!(seq < self.next_seq);
                total += 1;
            }
        }
        assert_eq!(total, self.len());
        self.entries.debug_validate_invariants();
    }

    fn unlink(&mut self, freq: u64, seq: u64) {
        self.unfile(freq, seq);
        if self.bucket_is_empty(freq) {
            let (prev, next) = self
                .buckets
                .get(&freq)
                .map(|bucket| (bucket.prev, bucket.next))
                .unwrap_or_default();
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.members.is_empty())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                members: BTreeMap::new(),
                prev,
                next,
            },
        );
        if let Some(prev_bucket) = prev.and_then(|p| self.buckets.get_mut(&p)) {
            prev_bucket.next = Some(freq);
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(&n)) {
            next_bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev_bucket) = prev.and_then(|p| self.buckets.get_mut(&p)) {
            prev_bucket.next = next;
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(&n)) {
            next_bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn file(&mut self, freq: u64, seq: u64, id: Handle) {
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            bucket.members.insert(seq, id);
        }
    }

    fn unfile(&mut self, freq: u64, seq: u64) {
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            bucket.members.remove(&seq);
        }
    }
}

impl<T> Default for FrequencyBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn insert_starts_at_frequency_one() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            assert_eq!(freq.frequency(a), Ok(1));
            assert_eq!(freq.min_freq(), Some(1));
            assert_eq!(freq.len(), 1);
            freq.debug_validate_invariants();
        }

        #[test]
        fn touch_increments_and_moves_bucket() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            assert_eq!(freq.touch(a), Ok(2));
            assert_eq!(freq.touch(a), Ok(3));
            assert_eq!(freq.min_freq(), Some(3));
            freq.debug_validate_invariants();
        }

        #[test]
        fn remove_returns_value_and_invalidates_handle() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            let b = freq.insert("b").unwrap();
            freq.touch(b).unwrap();

            assert_eq!(freq.remove(a), Ok("a"));
            assert_eq!(freq.min_freq(), Some(2));
            assert!(freq.touch(a).is_err());
            assert!(freq.remove(a).is_err());
            freq.debug_validate_invariants();
        }

        #[test]
        fn get_mut_keeps_frequency() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert(1).unwrap();
            freq.touch(a).unwrap();
            *freq.get_mut(a).unwrap() = 10;
            assert_eq!(freq.get(a), Ok(&10));
            assert_eq!(freq.frequency(a), Ok(2));
        }

        #[test]
        fn bounded_tracker_refuses() {
            let mut freq = FrequencyBuckets::bounded(1);
            assert!(freq.insert("a").is_ok());
            assert_eq!(freq.insert("b"), Err("b"));
        }

        #[test]
        fn clear_resets_state() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            freq.insert("b").unwrap();
            freq.clear();
            assert!(freq.is_empty());
            assert_eq!(freq.min_freq(), None);
            assert!(!freq.contains(a));
            assert_eq!(freq.pop_min(), None);
            freq.debug_validate_invariants();
        }
    }

    // ==============================================
    // Eviction Order
    // ==============================================

    mod eviction_order {
        use super::*;

        #[test]
        fn ties_break_fifo() {
            let mut freq = FrequencyBuckets::new();
            freq.insert("a").unwrap();
            freq.insert("b").unwrap();
            freq.insert("c").unwrap();
            assert_eq!(freq.pop_min(), Some(("a", 1)));
            assert_eq!(freq.pop_min(), Some(("b", 1)));
            assert_eq!(freq.pop_min(), Some(("c", 1)));
        }

        #[test]
        fn ties_go_to_oldest_insertion_regardless_of_touch_order() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            let b = freq.insert("b").unwrap();
            let c = freq.insert("c").unwrap();
            freq.touch(c).unwrap();
            freq.touch(b).unwrap();
            freq.touch(a).unwrap();
            freq.debug_validate_invariants();

            let order: Vec<_> = freq.iter_ids().map(|id| *freq.get(id).unwrap()).collect();
            assert_eq!(order, vec!["a", "b", "c"]);
            assert_eq!(freq.pop_min(), Some(("a", 2)));
            assert_eq!(freq.pop_min(), Some(("b", 2)));
            assert_eq!(freq.pop_min(), Some(("c", 2)));
        }

        #[test]
        fn saturated_frequency_stays_put() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            freq.entries.get_mut(a).unwrap().freq = u64::MAX - 1;
            freq.buckets.clear();
            freq.insert_bucket(u64::MAX - 1, None, None);
            freq.file(u64::MAX - 1, 0, a);
            freq.min_freq = u64::MAX - 1;

            assert_eq!(freq.touch(a), Ok(u64::MAX));
            assert_eq!(freq.touch(a), Ok(u64::MAX));
            assert_eq!(freq.min_freq(), Some(u64::MAX));
            freq.debug_validate_invariants();
        }

        #[test]
        fn lower_frequency_evicted_first() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            freq.insert("b").unwrap();
            let c = freq.insert("c").unwrap();
            freq.touch(a).unwrap();
            freq.touch(c).unwrap();
            freq.touch(c).unwrap();

            assert_eq!(freq.pop_min(), Some(("b", 1)));
            assert_eq!(freq.pop_min(), Some(("a", 2)));
            assert_eq!(freq.pop_min(), Some(("c", 3)));
        }

        #[test]
        fn iter_ids_matches_pop_sequence() {
            let mut freq = FrequencyBuckets::new();
            let ids: Vec<_> = (0..6).map(|i| freq.insert(i).unwrap()).collect();
            freq.touch(ids[0]).unwrap();
            freq.touch(ids[3]).unwrap();
            freq.touch(ids[3]).unwrap();
            freq.touch(ids[5]).unwrap();

            let order: Vec<i32> = freq
                .iter_ids()
                .map(|id| *freq.get(id).unwrap())
                .collect();
            let mut popped = Vec::new();
            while let Some((value, _)) = freq.pop_min() {
                popped.push(value);
            }
            assert_eq!(order, vec![1, 2, 4, 0, 5, 3]);
            assert_eq!(order, popped);
        }

        #[test]
        fn bucket_gap_is_linked_correctly() {
            let mut freq = FrequencyBuckets::new();
            let a = freq.insert("a").unwrap();
            for _ in 0..4 {
                freq.touch(a).unwrap();
            }
            freq.insert("b").unwrap();
            freq.debug_validate_invariants();
            let order: Vec<_> = freq.iter_ids().map(|id| *freq.get(id).unwrap()).collect();
            assert_eq!(order, vec!["b", "a"]);
        }
    }

    // ==============================================
    // Property Tests
    // ==============================================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the candidate is always the lowest frequency, and
            /// among equal frequencies the earliest insertion
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_candidate_is_min_frequency_then_oldest(
                ops in prop::collection::vec((0u8..3, any::<u16>()), 0..100)
            ) {
                let mut buckets: FrequencyBuckets<u16> = FrequencyBuckets::new();
                // (handle, frequency, insertion order)
                let mut model: Vec<(Handle, u64, usize)> = Vec::new();
                let mut inserted = 0usize;

                for (op, value) in ops {
                    match op {
                        0 => {
                            model.push((buckets.insert(value).unwrap(), 1, inserted));
                            inserted += 1;
                        }
                        1 if !model.is_empty() => {
                            let idx = value as usize % model.len();
                            model[idx].1 += 1;
                            prop_assert_eq!(buckets.touch(model[idx].0), Ok(model[idx].1));
                        }
                        2 => {
                            let expected = model
                                .iter()
                                .enumerate()
                                .min_by_key(|(_, entry)| (entry.1, entry.2))
                                .map(|(i, _)| i);
                            prop_assert_eq!(buckets.peek_min(), expected.map(|i| model[i].0));
                            if let Some(i) = expected {
                                let (_, f, _) = model.remove(i);
                                prop_assert_eq!(buckets.pop_min().map(|(_, freq)| freq), Some(f));
                            }
                        }
                        _ => {}
                    }
                    buckets.debug_validate_invariants();
                }
            }

            /// Property: invariants hold after any sequence of operations
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_invariants_always_hold(
                ops in prop::collection::vec((0u8..4, any::<u16>()), 0..100)
            ) {
                let mut buckets: FrequencyBuckets<u16> = FrequencyBuckets::new();
                let mut live: Vec<Handle> = Vec::new();

                for (op, value) in ops {
                    match op % 4 {
                        0 => { live.push(buckets.insert(value).unwrap()); }
                        1 => {
                            if !live.is_empty() {
                                let id = live[value as usize % live.len()];
                                buckets.touch(id).unwrap();
                            }
                        }
                        2 => {
                            if !live.is_empty() {
                                let id = live.swap_remove(value as usize % live.len());
                                buckets.remove(id).unwrap();
                            }
                        }
                        3 => {
                            if let Some(id) = buckets.peek_min() {
                                live.retain(|h| *h != id);
                                buckets.pop_min();
                            }
                        }
                        _ => unreachable!(),
                    }

                    buckets.debug_validate_invariants();
                    prop_assert_eq!(buckets.len(), live.len());
                }
            }
        }
    }
}
