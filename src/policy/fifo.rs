//! First In, First Out (FIFO) replacement policy.
//!
//! Evicts in insertion order. Accesses are ignored, so the victim sequence
//! depends only on the order elements were added.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          FifoPolicy<T>                                  │
//! │                                                                         │
//! │   front ──► [A] ◄──► [B] ◄──► [C] ◄──► [D] ◄── back                     │
//! │             ▲                            ▲                              │
//! │          oldest                        newest                           │
//! │          EVICT                         add() appends here               │
//! │                                                                         │
//! │   touch(): validates the handle, order unchanged                        │
//! │   update(): swaps value in place, order unchanged                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a `VecDeque` queue, elements can be removed from the middle in
//! O(1) without leaving stale entries behind.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::fifo::FifoPolicy;
//!
//! let mut fifo = FifoPolicy::new();
//! let a = fifo.add("a", Attributes::default()).unwrap();
//! let b = fifo.add("b", Attributes::default()).unwrap();
//! fifo.add("c", Attributes::default()).unwrap();
//!
//! fifo.touch(a).unwrap();
//! fifo.update(b, "b2", Attributes::default()).unwrap();
//! assert_eq!(fifo.peek_all(), vec![&"a", &"b2", &"c"]);
//! ```
use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::PolicyError;
use crate::policy::ordered::OrderedCore;
use crate::policy::{PolicyKind, ReplacementPolicy};

/// Insertion-order replacement policy.
#[derive(Debug, Clone)]
pub struct FifoPolicy<T> {
    core: OrderedCore<T>,
}

impl<T> FifoPolicy<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(hint: usize) -> Self {
        Self {
            core: OrderedCore::with_capacity(hint),
        }
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            core: OrderedCore::bounded(limit),
        }
    }

    /// Newest element, evicted last.
    pub fn peek_newest(&self) -> Option<&T> {
        self.core.back()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.core.debug_validate_invariants();
    }
}

impl<T> Default for FifoPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for FifoPolicy<T> {
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        self.core.push_back(value, attributes)
    }

    fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        self.core.update(handle, value, attributes)
    }

    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError> {
        self.core.check(handle)
    }

    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        self.core.remove(handle)
    }

    fn evict_next_entry(&mut self) -> Option<(T, Attributes)> {
        self.core.pop_front()
    }

    fn eviction_order(&self) -> Vec<Handle> {
        self.core.ids_front_to_back()
    }

    fn peek(&self) -> Option<&T> {
        self.core.front()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.core.values_front_to_back()
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.core.get(handle)
    }

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        self.core.attributes(handle)
    }

    fn clear(&mut self) {
        self.core.clear();
    }

    fn len(&self) -> usize {
        self.core.len()
    }

    fn volume(&self) -> u64 {
        self.core.volume()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }
}
