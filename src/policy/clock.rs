//! Clock replacement policy.
//!
//! Implements the Clock algorithm (also known as Second-Chance): an LRU
//! approximation where an access only sets a reference bit and the work of
//! ordering is deferred to eviction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         ClockPolicy<T> Layout                               │
//! │                                                                             │
//! │   ring: IntrusiveList<ClockEntry<T>>   (walked cyclically, tail → head)     │
//! │                                                                             │
//! │        ┌───┐      ┌───┐      ┌───┐      ┌───┐                             │
//! │        │ 1 │ ───► │ 2 │ ───► │ 3 │ ───► │ 4 │ ───┐                        │
//! │        │ref│      │   │      │ref│      │ref│    │                        │
//! │        └───┘      └───┘      └───┘      └───┘    │                        │
//! │          ▲                                       │                        │
//! │          └───────────────────────────────────────┘                        │
//! │          ▲                                                                  │
//! │        hand                                                                 │
//! │                                                                             │
//! │   add():   insert just behind the hand (scanned last)                       │
//! │   touch(): set referenced = true                                            │
//! │   evict(): sweep from hand, clear set bits, evict first clear entry         │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! EVICT():
//!   loop:
//!     entry = ring[hand]
//!     if entry.referenced:
//!       entry.referenced = false    // second chance
//!       hand = next(hand)
//!     else:
//!       hand = next(hand)
//!       remove entry
//!       return entry
//! ```
//!
//! With no reference bits set the sweep degenerates to FIFO. With every bit
//! set, one full revolution clears them all and the entry under the hand is
//! evicted.
//!
//! ## Performance Characteristics
//!
//! | Operation        | Time    | Notes                               |
//! |------------------|---------|-------------------------------------|
//! | `add`            | O(1)    | Splice before the hand              |
//! | `touch`          | O(1)    | Bit set                             |
//! | `remove`         | O(1)    | Advances the hand if it points here |
//! | `evict_next`     | O(1)*   | *Amortized; one sweep worst case    |
//! | `eviction_order` | O(n)    | Simulated sweep, state untouched    |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::clock::ClockPolicy;
//!
//! let mut clock = ClockPolicy::new();
//! let h: Vec<_> = (1..=4)
//!     .map(|i| clock.add(i, Attributes::default()).unwrap())
//!     .collect();
//!
//! clock.touch(h[2]).unwrap();
//! clock.touch(h[0]).unwrap();
//! clock.touch(h[3]).unwrap();
//!
//! assert_eq!(clock.peek_all(), vec![&2, &1, &3, &4]);
//! assert_eq!(clock.evict_next(), Some(2));
//! assert_eq!(clock.evict_next(), Some(1));
//! ```
use std::collections::VecDeque;

use crate::attributes::Attributes;
use crate::ds::{Handle, IntrusiveList};
use crate::error::PolicyError;
use crate::policy::{Entry, PolicyKind, ReplacementPolicy};

#[derive(Debug, Clone)]
#[repr(C)]
struct ClockEntry<T> {
    referenced: bool,
    entry: Entry<T>,
}

/// Second-chance replacement policy with a sweeping clock hand.
#[derive(Debug, Clone)]
pub struct ClockPolicy<T> {
    ring: IntrusiveList<ClockEntry<T>>,
    hand: Option<Handle>,
    volume: u64,
}

impl<T> ClockPolicy<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(hint: usize) -> Self {
        Self::from_ring(IntrusiveList::with_capacity(hint))
    }

    pub fn bounded(limit: usize) -> Self {
        Self::from_ring(IntrusiveList::bounded(limit))
    }

    fn from_ring(ring: IntrusiveList<ClockEntry<T>>) -> Self {
        Self {
            ring,
            hand: None,
            volume: 0,
        }
    }

    /// Handle the next sweep starts from.
    pub fn hand(&self) -> Option<Handle> {
        self.hand
    }

    pub fn is_referenced(&self, handle: Handle) -> Result<bool, PolicyError> {
        self.ring.get(handle).map(|slot| slot.referenced)
    }

    /// Handles in sweep order starting at the hand.
    fn ring_from_hand(&self) -> impl Iterator<Item = Handle> + '_ {
        let mut next = self.hand;
        let mut remaining = self.ring.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let id = next?;
            remaining -= 1;
            next = self.ring.next_id_cyclic(id).ok();
            Some(id)
        })
    }

    /// Removes `id`, moving the hand past it first.
    fn unlink(&mut self, id: Handle) -> Result<Entry<T>, PolicyError> {
        if self.hand == Some(id) {
            let next = self.ring.next_id_cyclic(id)?;
            self.hand = (next != id).then_some(next);
        }
        let slot = self.ring.remove(id)?;
        self.volume = self.volume.saturating_sub(slot.entry.attributes.size());
        Ok(slot.entry)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.ring.debug_validate_invariants();
        match self.hand {
            Some(hand) => assert!(self.ring.contains(hand)),
            None => assert!(self.ring.is_empty()),
        }
        let volume = self
            .ring
            .iter()
            .fold(0u64, |acc, slot| acc.saturating_add(slot.entry.attributes.size()));
        assert_eq!(volume, self.volume);
    }
}

impl<T> Default for ClockPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for ClockPolicy<T> {
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        let slot = ClockEntry {
            referenced: false,
            entry: Entry::new(value, attributes),
        };
        let id = match self.hand {
            Some(hand) if Some(hand) != self.ring.front_id() => {
                self.ring.insert_before(hand, slot).ok()?.ok()?
            }
            _ => self.ring.push_back(slot).ok()?,
        };
        if self.hand.is_none() {
            self.hand = Some(id);
        }
        self.volume = self.volume.saturating_add(attributes.size());
        Some(id)
    }

    fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        let slot = self.ring.get_mut(handle)?;
        let old = std::mem::replace(&mut slot.entry, Entry::new(value, attributes));
        self.volume = self
            .volume
            .saturating_sub(old.attributes.size())
            .saturating_add(attributes.size());
        Ok(old.value)
    }

    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError> {
        self.ring.get_mut(handle)?.referenced = true;
        Ok(())
    }

    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        self.unlink(handle).map(|entry| entry.value)
    }

    fn evict_next_entry(&mut self) -> Option<(T, Attributes)> {
        loop {
            let hand = self.hand?;
            let slot = self.ring.get_mut(hand).ok()?;
            if slot.referenced {
                slot.referenced = false;
                self.hand = self.ring.next_id_cyclic(hand).ok();
                continue;
            }
            return self.unlink(hand).ok().map(Entry::into_parts);
        }
    }

    fn eviction_order(&self) -> Vec<Handle> {
        let mut sweep: VecDeque<(Handle, bool)> = self
            .ring_from_hand()
            .filter_map(|id| self.ring.get(id).ok().map(|slot| (id, slot.referenced)))
            .collect();
        let mut order = Vec::with_capacity(sweep.len());
        while let Some((id, referenced)) = sweep.pop_front() {
            if referenced {
                sweep.push_back((id, false));
            } else {
                order.push(id);
            }
        }
        order
    }

    fn peek(&self) -> Option<&T> {
        let victim = self
            .ring_from_hand()
            .find(|&id| matches!(self.ring.get(id), Ok(slot) if !slot.referenced))
            .or(self.hand)?;
        self.get(victim).ok()
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.ring.get(handle).map(|slot| &slot.entry.value)
    }

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        self.ring.get(handle).map(|slot| slot.entry.attributes)
    }

    fn clear(&mut self) {
        self.ring.clear();
        self.hand = None;
        self.volume = 0;
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn volume(&self) -> u64 {
        self.volume
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(n: u32) -> (ClockPolicy<u32>, Vec<Handle>) {
        let mut clock = ClockPolicy::new();
        let handles = (1..=n)
            .map(|i| clock.add(i, Attributes::default()).unwrap())
            .collect();
        (clock, handles)
    }

    // ==============================================
    // Sweep behaviour
    // ==============================================

    mod sweep {
        use super::*;

        #[test]
        fn no_reference_bits_is_fifo() {
            let (mut clock, _) = ring_of(4);
            assert_eq!(clock.peek_all(), vec![&1, &2, &3, &4]);
            for expected in 1..=4 {
                assert_eq!(clock.evict_next(), Some(expected));
            }
            assert_eq!(clock.evict_next(), None);
        }

        #[test]
        fn second_chance_scenario() {
            let (mut clock, h) = ring_of(4);
            clock.touch(h[2]).unwrap();
            clock.touch(h[2]).unwrap();
            for _ in 0..3 {
                clock.touch(h[0]).unwrap();
            }
            clock.touch(h[3]).unwrap();

            assert_eq!(clock.peek(), Some(&2));
            assert_eq!(clock.peek_all(), vec![&2, &1, &3, &4]);
            assert_eq!(clock.evict_next(), Some(2));
            assert_eq!(clock.evict_next(), Some(1));
            assert_eq!(clock.evict_next(), Some(3));
            assert_eq!(clock.evict_next(), Some(4));
            assert!(clock.is_empty());
            clock.debug_validate_invariants();
        }

        #[test]
        fn all_referenced_evicts_entry_under_hand() {
            let (mut clock, h) = ring_of(3);
            for &id in &h {
                clock.touch(id).unwrap();
            }
            assert_eq!(clock.peek(), Some(&1));
            assert_eq!(clock.evict_next(), Some(1));
            assert_eq!(clock.is_referenced(h[1]), Ok(false));
            assert_eq!(clock.is_referenced(h[2]), Ok(false));
        }

        #[test]
        fn new_entries_land_behind_the_hand() {
            let (mut clock, h) = ring_of(3);
            clock.touch(h[0]).unwrap();
            assert_eq!(clock.evict_next(), Some(2));
            assert_eq!(clock.hand(), Some(h[2]));

            clock.add(9, Attributes::default()).unwrap();
            assert_eq!(clock.peek_all(), vec![&3, &1, &9]);
            clock.debug_validate_invariants();
        }

        #[test]
        fn eviction_order_leaves_bits_untouched() {
            let (mut clock, h) = ring_of(3);
            clock.touch(h[0]).unwrap();
            let _ = clock.eviction_order();
            assert_eq!(clock.is_referenced(h[0]), Ok(true));
            assert_eq!(clock.hand(), Some(h[0]));
        }
    }

    // ==============================================
    // Handles
    // ==============================================

    mod handles {
        use super::*;

        #[test]
        fn removing_the_hand_advances_it() {
            let (mut clock, h) = ring_of(3);
            assert_eq!(clock.hand(), Some(h[0]));
            assert_eq!(clock.remove(h[0]), Ok(1));
            assert_eq!(clock.hand(), Some(h[1]));
            clock.debug_validate_invariants();

            clock.remove(h[1]).unwrap();
            clock.remove(h[2]).unwrap();
            assert_eq!(clock.hand(), None);
            clock.debug_validate_invariants();
        }

        #[test]
        fn update_keeps_reference_bit() {
            let (mut clock, h) = ring_of(2);
            clock.touch(h[0]).unwrap();
            assert_eq!(clock.update(h[0], 10, Attributes::default()), Ok(1));
            assert_eq!(clock.is_referenced(h[0]), Ok(true));
            assert_eq!(clock.evict_next(), Some(2));
        }

        #[test]
        fn stale_handles_rejected() {
            let (mut clock, h) = ring_of(2);
            clock.evict_next();
            assert!(clock.touch(h[0]).is_err());
            assert!(clock.is_referenced(h[0]).is_err());
            assert!(clock.remove(h[0]).is_err());
        }

        #[test]
        fn clear_resets_hand_and_volume() {
            let (mut clock, _) = ring_of(3);
            clock.clear();
            assert_eq!(clock.hand(), None);
            assert_eq!(clock.volume(), 0);
            clock.add(1, Attributes::default()).unwrap();
            assert_eq!(clock.peek(), Some(&1));
        }
    }
}
