//! LIFO (Last In, First Out) replacement policy.
//!
//! Implements a stack: the most recently inserted element is evicted first.
//! Accesses do not change the order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          LifoPolicy<T>                                  │
//! │                                                                         │
//! │   Insert A, B, C, D                                                     │
//! │                                                                         │
//! │   front ──► [A] ◄──► [B] ◄──► [C] ◄──► [D] ◄── back                     │
//! │           bottom                         top                            │
//! │            keep                         EVICT                           │
//! │                                                                         │
//! │   evict_next() → D, then C, then B, then A                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation    | Time | Notes                         |
//! |--------------|------|-------------------------------|
//! | `add`        | O(1) | Push on top                   |
//! | `touch`      | O(1) | Handle check only             |
//! | `remove`     | O(1) | Unlink anywhere in the stack  |
//! | `evict_next` | O(1) | Pop the top                   |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::lifo::LifoPolicy;
//!
//! let mut lifo = LifoPolicy::new();
//! for value in ["A", "B", "C"] {
//!     lifo.add(value, Attributes::default()).unwrap();
//! }
//! assert_eq!(lifo.evict_next(), Some("C"));
//! assert_eq!(lifo.evict_next(), Some("B"));
//! assert_eq!(lifo.evict_next(), Some("A"));
//! ```
use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::PolicyError;
use crate::policy::ordered::OrderedCore;
use crate::policy::{PolicyKind, ReplacementPolicy};

/// Stack-order replacement policy.
#[derive(Debug, Clone)]
pub struct LifoPolicy<T> {
    core: OrderedCore<T>,
}

impl<T> LifoPolicy<T> {
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

    /// Bottom of the stack, evicted last.
    pub fn peek_oldest(&self) -> Option<&T> {
        self.core.front()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.core.debug_validate_invariants();
    }
}

impl<T> Default for LifoPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LifoPolicy<T> {
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
        self.core.pop_back()
    }

    fn eviction_order(&self) -> Vec<Handle> {
        self.core.ids_back_to_front()
    }

    fn peek(&self) -> Option<&T> {
        self.core.back()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.core.values_back_to_front()
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
        PolicyKind::Lifo
    }
}
