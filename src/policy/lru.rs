//! # Least Recently Used (LRU) Replacement Policy
//!
//! Evicts the element that has gone longest without being added or touched.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                           LruPolicy<T>                                   │
//!   │                                                                          │
//!   │   ┌──────────────────────────────────────────────────────────────────┐   │
//!   │   │  OrderedCore<T>  (IntrusiveList<Entry<T>> + running volume)      │   │
//!   │   │                                                                  │   │
//!   │   │  front ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── back         │   │
//!   │   │    (LRU)   │ h_1  │      │ h_2  │      │ h_3  │   (MRU)          │   │
//!   │   │            └──────┘      └──────┘      └──────┘                  │   │
//!   │   │                                                                  │   │
//!   │   │  Least Recently Used ────────────────► Most Recently Used        │   │
//!   │   └──────────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   ADD
//!   ═══════════════════════════════════════════════════════════════════════════
//!     front ──► [A] ◄──► [B] ◄── back
//!     add(C):  append at back
//!     front ──► [A] ◄──► [B] ◄──► [C] ◄── back
//!
//!   TOUCH
//!   ═══════════════════════════════════════════════════════════════════════════
//!     touch(A): move_to_back, O(1)
//!     front ──► [B] ◄──► [C] ◄──► [A] ◄── back
//!
//!   EVICT
//!   ═══════════════════════════════════════════════════════════════════════════
//!     evict_next(): pop_front → B
//!     front ──► [C] ◄──► [A] ◄── back
//! ```
//!
//! ## Operations
//!
//! | Method            | Complexity | Description                          |
//! |-------------------|------------|--------------------------------------|
//! | `add`             | O(1)       | Append at the MRU end                |
//! | `touch`           | O(1)       | Move to the MRU end                  |
//! | `update`          | O(1)       | Replace value, position unchanged    |
//! | `remove`          | O(1)       | Unlink and free the slot             |
//! | `evict_next`      | O(1)       | Pop the LRU end                      |
//! | `peek`            | O(1)       | LRU end without removal              |
//! | `peek_all`        | O(n)       | LRU → MRU                            |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::lru::LruPolicy;
//!
//! let mut lru = LruPolicy::new();
//! let a = lru.add("a", Attributes::default()).unwrap();
//! lru.add("b", Attributes::default()).unwrap();
//! lru.add("c", Attributes::default()).unwrap();
//!
//! lru.touch(a).unwrap();
//! assert_eq!(lru.peek(), Some(&"b"));
//! assert_eq!(lru.evict_next(), Some("b"));
//! assert_eq!(lru.evict_next(), Some("c"));
//! assert_eq!(lru.evict_next(), Some("a"));
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. Wrap in [`Locked`](crate::sync::Locked) to share.
use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::PolicyError;
use crate::policy::ordered::OrderedCore;
use crate::policy::{PolicyKind, ReplacementPolicy};

/// Least-recently-used replacement policy.
#[derive(Debug, Clone)]
pub struct LruPolicy<T> {
    core: OrderedCore<T>,
}

impl<T> LruPolicy<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-allocates room for `hint` elements.
    pub fn with_capacity(hint: usize) -> Self {
        Self {
            core: OrderedCore::with_capacity(hint),
        }
    }

    /// Refuses `add` once `limit` elements are tracked.
    pub fn bounded(limit: usize) -> Self {
        Self {
            core: OrderedCore::bounded(limit),
        }
    }

    /// The most recently used element, which is evicted last.
    pub fn peek_mru(&self) -> Option<&T> {
        self.core.back()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.core.debug_validate_invariants();
    }
}

impl<T> Default for LruPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LruPolicy<T> {
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
        self.core.move_to_back(handle)
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
        PolicyKind::Lru
    }
}
