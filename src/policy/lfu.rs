//! # Least Frequently Used (LFU) Replacement Policy
//!
//! Evicts the element with the lowest access count. Among elements with the
//! same count, the oldest insertion goes first, however the touches that
//! brought them there were interleaved.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                           LfuPolicy<T>                                   │
//!   │                                                                          │
//!   │   buckets: FrequencyBuckets<Entry<T>>                                    │
//!   │                                                                          │
//!   │   min_freq ─┐                                                            │
//!   │             ▼                                                            │
//!   │   freq=1:  { seq 1: B, seq 4: E }   ──► evict B first                    │
//!   │               │                                                          │
//!   │               ▼ next                                                     │
//!   │   freq=3:  { seq 0: A }                                                  │
//!   │               │                                                          │
//!   │               ▼ next                                                     │
//!   │   freq=7:  { seq 2: C, seq 3: D }                                        │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   add(X):      X gets the next insertion seq, enters freq=1
//!   touch(X):    X leaves freq=f, enters f+1 under the same seq
//!                empty buckets are unlinked, min_freq follows
//!   evict_next:  lowest seq of the min_freq bucket
//! ```
//!
//! `eviction_order` walks buckets upward from `min_freq`, each by ascending
//! seq, which is exactly the sequence repeated `evict_next` calls produce.
//!
//! ## Operations
//!
//! | Method           | Complexity | Description                         |
//! |------------------|------------|-------------------------------------|
//! | `add`            | O(log b)   | Enter bucket 1                      |
//! | `touch`          | O(log b)   | Move to bucket `freq + 1`           |
//! | `update`         | O(1)       | Replace value, frequency unchanged  |
//! | `remove`         | O(log b)   | Leave its bucket                    |
//! | `evict_next`     | O(log b)   | Oldest entry of the lowest bucket   |
//! | `frequency`      | O(1)       | Current access count                |
//!
//! `b` is the number of elements sharing the affected frequency.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::lfu::LfuPolicy;
//!
//! let mut lfu = LfuPolicy::new();
//! let a = lfu.add("a", Attributes::default()).unwrap();
//! let b = lfu.add("b", Attributes::default()).unwrap();
//! lfu.add("c", Attributes::default()).unwrap();
//!
//! lfu.touch(a).unwrap();
//! lfu.touch(b).unwrap();
//! lfu.touch(a).unwrap();
//!
//! assert_eq!(lfu.frequency(a), Ok(3));
//! assert_eq!(lfu.peek_all(), vec![&"c", &"b", &"a"]);
//! ```
use crate::attributes::Attributes;
use crate::ds::{FrequencyBuckets, Handle};
use crate::error::PolicyError;
use crate::policy::{Entry, PolicyKind, ReplacementPolicy};

/// Least-frequently-used replacement policy; ties go to the oldest insertion.
#[derive(Debug, Clone)]
pub struct LfuPolicy<T> {
    buckets: FrequencyBuckets<Entry<T>>,
    volume: u64,
}

impl<T> LfuPolicy<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(hint: usize) -> Self {
        Self::from_buckets(FrequencyBuckets::with_capacity(hint))
    }

    pub fn bounded(limit: usize) -> Self {
        Self::from_buckets(FrequencyBuckets::bounded(limit))
    }

    fn from_buckets(buckets: FrequencyBuckets<Entry<T>>) -> Self {
        Self { buckets, volume: 0 }
    }

    /// Access count of `handle`; `1` right after `add`.
    pub fn frequency(&self, handle: Handle) -> Result<u64, PolicyError> {
        self.buckets.frequency(handle)
    }

    /// Lowest access count among live elements.
    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.buckets.debug_validate_invariants();
        let volume = self
            .buckets
            .iter_ids()
            .filter_map(|id| self.buckets.get(id).ok())
            .fold(0u64, |acc, entry| acc.saturating_add(entry.attributes.size()));
        assert_eq!(volume, self.volume);
    }
}

impl<T> Default for LfuPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LfuPolicy<T> {
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        let id = self.buckets.insert(Entry::new(value, attributes)).ok()?;
        self.volume = self.volume.saturating_add(attributes.size());
        Some(id)
    }

    fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        let entry = self.buckets.get_mut(handle)?;
        let old = std::mem::replace(entry, Entry::new(value, attributes));
        self.volume = self
            .volume
            .saturating_sub(old.attributes.size())
            .saturating_add(attributes.size());
        Ok(old.value)
    }

    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError> {
        self.buckets.touch(handle).map(|_| ())
    }

    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        let entry = self.buckets.remove(handle)?;
        self.volume = self.volume.saturating_sub(entry.attributes.size());
        Ok(entry.value)
    }

    fn evict_next_entry(&mut self) -> Option<(T, Attributes)> {
        let (entry, _freq) = self.buckets.pop_min()?;
        self.volume = self.volume.saturating_sub(entry.attributes.size());
        Some(entry.into_parts())
    }

    fn eviction_order(&self) -> Vec<Handle> {
        self.buckets.iter_ids().collect()
    }

    fn peek(&self) -> Option<&T> {
        let id = self.buckets.peek_min()?;
        self.get(id).ok()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.buckets
            .iter_ids()
            .filter_map(|id| self.buckets.get(id).ok())
            .map(|entry| &entry.value)
            .collect()
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.buckets.get(handle).map(|entry| &entry.value)
    }

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        self.buckets.get(handle).map(|entry| entry.attributes)
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.volume = 0;
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn volume(&self) -> u64 {
        self.volume
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // Frequency tracking
    // ==============================================

    mod frequency {
        use super::*;

        #[test]
        fn add_starts_at_one_and_touch_increments() {
            let mut lfu = LfuPolicy::new();
            let a = lfu.add('a', Attributes::default()).unwrap();
            assert_eq!(lfu.frequency(a), Ok(1));
            lfu.touch(a).unwrap();
            lfu.touch(a).unwrap();
            assert_eq!(lfu.frequency(a), Ok(3));
            assert_eq!(lfu.min_frequency(), Some(3));
        }

        #[test]
        fn update_keeps_frequency() {
            let mut lfu = LfuPolicy::new();
            let a = lfu.add(1, Attributes::default()).unwrap();
            lfu.touch(a).unwrap();
            assert_eq!(lfu.update(a, 2, Attributes::new().with_size(4)), Ok(1));
            assert_eq!(lfu.frequency(a), Ok(2));
            assert_eq!(lfu.volume(), 4);
            lfu.debug_validate_invariants();
        }
    }

    // ==============================================
    // Eviction order
    // ==============================================

    mod eviction {
        use super::*;

        #[test]
        fn lowest_frequency_goes_first() {
            let mut lfu = LfuPolicy::new();
            let hot = lfu.add("hot", Attributes::default()).unwrap();
            lfu.add("cold", Attributes::default()).unwrap();
            let warm = lfu.add("warm", Attributes::default()).unwrap();
            for _ in 0..5 {
                lfu.touch(hot).unwrap();
            }
            lfu.touch(warm).unwrap();

            assert_eq!(lfu.evict_next(), Some("cold"));
            assert_eq!(lfu.evict_next(), Some("warm"));
            assert_eq!(lfu.evict_next(), Some("hot"));
            assert_eq!(lfu.evict_next(), None);
        }

        #[test]
        fn ties_go_to_oldest_insertion() {
            let mut lfu = LfuPolicy::new();
            let a = lfu.add("A", Attributes::default()).unwrap();
            let b = lfu.add("B", Attributes::default()).unwrap();
            lfu.touch(b).unwrap();
            lfu.touch(a).unwrap();

            assert_eq!(lfu.frequency(a), lfu.frequency(b));
            assert_eq!(lfu.peek(), Some(&"A"));
            assert_eq!(lfu.peek_all(), vec![&"A", &"B"]);
            assert_eq!(lfu.evict_next(), Some("A"));
            assert_eq!(lfu.evict_next(), Some("B"));
        }

        #[test]
        fn later_insertion_reaching_frequency_first_still_waits() {
            let mut lfu = LfuPolicy::new();
            let handles: Vec<_> = (0..4)
                .map(|i| lfu.add(i, Attributes::default()).unwrap())
                .collect();
            for &id in handles.iter().rev() {
                lfu.touch(id).unwrap();
                lfu.touch(id).unwrap();
            }
            lfu.debug_validate_invariants();
            assert_eq!(lfu.peek_all(), vec![&0, &1, &2, &3]);
        }

        #[test]
        fn peek_all_matches_evictions() {
            let mut lfu = LfuPolicy::new();
            let handles: Vec<_> = (0..8)
                .map(|i| lfu.add(i, Attributes::default()).unwrap())
                .collect();
            for (i, &id) in handles.iter().enumerate() {
                for _ in 0..(i % 3) {
                    lfu.touch(id).unwrap();
                }
            }
            let predicted: Vec<i32> = lfu.peek_all().into_iter().copied().collect();
            let mut evicted = Vec::new();
            while let Some(v) = lfu.evict_next() {
                evicted.push(v);
            }
            assert_eq!(predicted, vec![0, 3, 6, 1, 4, 7, 2, 5]);
            assert_eq!(predicted, evicted);
        }

        #[test]
        fn remove_empties_bucket_and_moves_min() {
            let mut lfu = LfuPolicy::new();
            let a = lfu.add(1, Attributes::default()).unwrap();
            let b = lfu.add(2, Attributes::default()).unwrap();
            lfu.touch(b).unwrap();
            assert_eq!(lfu.remove(a), Ok(1));
            assert_eq!(lfu.min_frequency(), Some(2));
            assert!(lfu.frequency(a).is_err());
            lfu.debug_validate_invariants();
        }

        #[test]
        fn clone_preserves_buckets() {
            let mut lfu = LfuPolicy::new();
            let a = lfu.add('a', Attributes::default()).unwrap();
            lfu.add('b', Attributes::default()).unwrap();
            lfu.touch(a).unwrap();
            let mut copy = lfu.clone();
            assert_eq!(copy.evict_next(), Some('b'));
            assert_eq!(lfu.peek_all(), vec![&'b', &'a']);
            assert_eq!(copy.frequency(a), Ok(2));
        }
    }
}
