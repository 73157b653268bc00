//! Most Recently Used (MRU) replacement policy.
//!
//! Evicts the element that was added or touched last. Useful for cyclic
//! scans larger than the cache, where the element just read is the one
//! least likely to be read again soon.
//!
//! ## Architecture
//!
//! ```text
//!   front ──► [A] ◄──► [B] ◄──► [C] ◄── back
//!    (LRU)                        (MRU)  ◄── evict_next() pops here
//!
//!   touch(A):
//!   front ──► [B] ◄──► [C] ◄──► [A] ◄── back
//!                                 ▲
//!                                 └── next victim
//! ```
//!
//! Same list layout as [`LruPolicy`](crate::policy::lru::LruPolicy), evicted
//! from the other end.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::mru::MruPolicy;
//!
//! let mut mru = MruPolicy::new();
//! let a = mru.add(1, Attributes::default()).unwrap();
//! mru.add(2, Attributes::default()).unwrap();
//! mru.touch(a).unwrap();
//!
//! assert_eq!(mru.evict_next(), Some(1));
//! assert_eq!(mru.evict_next(), Some(2));
//! ```
use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::PolicyError;
use crate::policy::ordered::OrderedCore;
use crate::policy::{PolicyKind, ReplacementPolicy};

/// Most-recently-used replacement policy.
#[derive(Debug, Clone)]
pub struct MruPolicy<T> {
    core: OrderedCore<T>,
}

impl<T> MruPolicy<T> {
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

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.core.debug_validate_invariants();
    }
}

impl<T> Default for MruPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for MruPolicy<T> {
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
        PolicyKind::Mru
    }
}
