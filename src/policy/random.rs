//! Random replacement policy.
//!
//! Victims are chosen uniformly at random among live elements. Accesses are
//! ignored. Serves as the baseline the other policies are measured against.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        RandomPolicy<T> Layout                               │
//! │                                                                             │
//! │   set: DenseSet<Entry<T>>                                                   │
//! │   ┌────────┬─────────────────┐        dense: Vec<Handle>                    │
//! │   │ Handle │ (pos, entry)    │        ┌─────┬─────┬─────┬─────┐             │
//! │   ├────────┼─────────────────┤        │  0  │  1  │  2  │  3  │             │
//! │   │  h_a   │ (0, A)          │ ─────► │ h_a │ h_b │ h_c │ h_d │             │
//! │   │  h_b   │ (1, B)          │        └─────┴─────┴─────┴─────┘             │
//! │   │  h_c   │ (2, C)          │                                              │
//! │   │  h_d   │ (3, D)          │        rng: SmallRng (seedable)              │
//! │   └────────┴─────────────────┘                                              │
//! │                                                                             │
//! │   evict_next():                                                             │
//! │     1. i = rng.random_range(0..len)                                         │
//! │     2. victim = dense[i]                                                    │
//! │     3. swap dense[i] with dense[len - 1], pop, patch moved position         │
//! │     4. free victim's slot                                                   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `eviction_order`, `peek` and `peek_all` run the same draw sequence on a
//! copy of the generator, so they predict exactly what successive
//! `evict_next` calls return as long as nothing else changes in between.
//! A clone copies the generator state and replays the same victims.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::random::RandomPolicy;
//!
//! let mut random = RandomPolicy::with_seed(7);
//! for i in 0..5 {
//!     random.add(i, Attributes::default()).unwrap();
//! }
//!
//! let predicted: Vec<i32> = random.peek_all().into_iter().copied().collect();
//! let mut evicted = Vec::new();
//! while let Some(value) = random.evict_next() {
//!     evicted.push(value);
//! }
//! assert_eq!(predicted, evicted);
//! ```
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::attributes::Attributes;
use crate::ds::{DenseSet, Handle};
use crate::error::PolicyError;
use crate::policy::{Entry, PolicyKind, ReplacementPolicy};

/// Uniform random replacement policy.
#[derive(Debug, Clone)]
pub struct RandomPolicy<T> {
    set: DenseSet<Entry<T>>,
    rng: SmallRng,
    volume: u64,
}

impl<T> RandomPolicy<T> {
    /// Creates an empty policy seeded from the operating system.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(hint: usize) -> Self {
        Self::from_parts(DenseSet::with_capacity(hint), SmallRng::from_os_rng())
    }

    pub fn bounded(limit: usize) -> Self {
        Self::from_parts(DenseSet::bounded(limit), SmallRng::from_os_rng())
    }

    /// Creates an empty policy with a fixed seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(DenseSet::new(), SmallRng::seed_from_u64(seed))
    }

    fn from_parts(set: DenseSet<Entry<T>>, rng: SmallRng) -> Self {
        Self {
            set,
            rng,
            volume: 0,
        }
    }

    /// Replaces the generator state; tracked elements are unaffected.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    fn draw(rng: &mut SmallRng, len: usize) -> usize {
        rng.random_range(0..len)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.set.debug_validate_invariants();
        let volume = self
            .set
            .handles()
            .iter()
            .filter_map(|&id| self.set.get(id).ok())
            .fold(0u64, |acc, entry| acc.saturating_add(entry.attributes.size()));
        assert_eq!(volume, self.volume);
    }
}

impl<T> Default for RandomPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for RandomPolicy<T> {
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        let id = self.set.insert(Entry::new(value, attributes)).ok()?;
        self.volume = self.volume.saturating_add(attributes.size());
        Some(id)
    }

    fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        let entry = self.set.get_mut(handle)?;
        let old = std::mem::replace(entry, Entry::new(value, attributes));
        self.volume = self
            .volume
            .saturating_sub(old.attributes.size())
            .saturating_add(attributes.size());
        Ok(old.value)
    }

    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError> {
        self.set.get(handle).map(|_| ())
    }

    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        let entry = self.set.remove(handle)?;
        self.volume = self.volume.saturating_sub(entry.attributes.size());
        Ok(entry.value)
    }

    fn evict_next_entry(&mut self) -> Option<(T, Attributes)> {
        if self.set.is_empty() {
            return None;
        }
        let pos = Self::draw(&mut self.rng, self.set.len());
        let victim = self.set.handle_at(pos)?;
        let entry = self.set.remove(victim).ok()?;
        self.volume = self.volume.saturating_sub(entry.attributes.size());
        Some(entry.into_parts())
    }

    fn eviction_order(&self) -> Vec<Handle> {
        let mut rng = self.rng.clone();
        let mut dense = self.set.handles().to_vec();
        let mut order = Vec::with_capacity(dense.len());
        while !dense.is_empty() {
            let pos = Self::draw(&mut rng, dense.len());
            order.push(dense.swap_remove(pos));
        }
        order
    }

    fn peek(&self) -> Option<&T> {
        if self.set.is_empty() {
            return None;
        }
        let pos = Self::draw(&mut self.rng.clone(), self.set.len());
        let id = self.set.handle_at(pos)?;
        self.get(id).ok()
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.set.get(handle).map(|entry| &entry.value)
    }

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        self.set.get(handle).map(|entry| entry.attributes)
    }

    fn clear(&mut self) {
        self.set.clear();
        self.volume = 0;
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn volume(&self) -> u64 {
        self.volume
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Random
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(n: u32, seed: u64) -> (RandomPolicy<u32>, Vec<Handle>) {
        let mut random = RandomPolicy::with_seed(seed);
        let handles = (0..n)
            .map(|i| random.add(i, Attributes::default()).unwrap())
            .collect();
        (random, handles)
    }

    #[test]
    fn evicts_every_element_exactly_once() {
        let (mut random, _) = seeded(50, 1);
        let mut seen = HashSet::new();
        while let Some(value) = random.evict_next() {
            assert!(seen.insert(value));
        }
        assert_eq!(seen.len(), 50);
        assert_eq!(random.volume(), 0);
    }

    #[test]
    fn peek_predicts_next_victim() {
        let (mut random, _) = seeded(20, 3);
        for _ in 0..20 {
            let predicted = random.peek().copied();
            assert_eq!(random.evict_next(), predicted);
            random.debug_validate_invariants();
        }
        assert_eq!(random.peek(), None);
    }

    #[test]
    fn same_seed_same_sequence() {
        let (mut a, _) = seeded(30, 99);
        let (mut b, _) = seeded(30, 99);
        for _ in 0..30 {
            assert_eq!(a.evict_next(), b.evict_next());
        }
    }

    #[test]
    fn clone_replays_victims() {
        let (mut random, _) = seeded(10, 5);
        random.evict_next();
        let mut copy = random.clone();
        for _ in 0..9 {
            assert_eq!(random.evict_next(), copy.evict_next());
        }
    }

    #[test]
    fn reseed_changes_future_draws_only() {
        let (mut random, handles) = seeded(10, 5);
        random.reseed(11);
        assert_eq!(random.len(), 10);
        assert_eq!(random.get(handles[3]), Ok(&3));
        let (mut expected, _) = seeded(10, 11);
        assert_eq!(random.eviction_order().len(), 10);
        assert_eq!(random.evict_next(), expected.evict_next());
    }

    #[test]
    fn remove_keeps_dense_index_consistent() {
        let (mut random, handles) = seeded(8, 2);
        for &id in handles.iter().step_by(2) {
            random.remove(id).unwrap();
            random.debug_validate_invariants();
        }
        assert_eq!(random.len(), 4);
        let mut rest: Vec<u32> = random.peek_all().into_iter().copied().collect();
        rest.sort_unstable();
        assert_eq!(rest, vec![1, 3, 5, 7]);
    }

    #[test]
    fn touch_validates_only() {
        let (mut random, handles) = seeded(2, 0);
        random.touch(handles[0]).unwrap();
        random.remove(handles[0]).unwrap();
        assert!(random.touch(handles[0]).is_err());
    }
}
