//! Scoped-lock decorator.
//!
//! Policies and the coordinator are single-writer. [`Locked`] makes any of
//! them shareable by guarding it with a `parking_lot::Mutex`; every call,
//! read-only ones included, runs under the lock.
//!
//! ```text
//!   Arc<Locked<P>>
//!        │
//!        ▼
//!   ┌──────────────────────┐
//!   │ Mutex<P>             │   with(|p| ...)   arbitrary scoped access
//!   │                      │   add / touch ... policy pass-throughs
//!   └──────────────────────┘
//! ```
//!
//! References cannot escape the lock, so reads that would return `&T` come in
//! cloning flavours (`get_cloned`, `peek_cloned`, `peek_all_cloned`).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::lru::LruPolicy;
//! use evictkit::sync::Locked;
//!
//! let shared = Arc::new(Locked::new(LruPolicy::new()));
//! thread::scope(|s| {
//!     for t in 0..4u32 {
//!         let shared = Arc::clone(&shared);
//!         s.spawn(move || {
//!             for i in 0..10 {
//!                 shared.add(t * 10 + i, Attributes::default());
//!             }
//!         });
//!     }
//! });
//! assert_eq!(shared.len(), 40);
//! ```
use std::fmt;

use parking_lot::Mutex;

use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::PolicyError;
use crate::policy::{PolicyKind, ReplacementPolicy};

/// Mutual-exclusion wrapper around a policy or coordinator.
pub struct Locked<P> {
    inner: Mutex<P>,
}

impl<P> Locked<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Runs `f` with exclusive access and returns its result.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn into_inner(self) -> P {
        self.inner.into_inner()
    }

    /// Direct access when the caller already holds `&mut self`.
    pub fn get_mut(&mut self) -> &mut P {
        self.inner.get_mut()
    }
}

impl<P> Locked<P> {
    pub fn add<T>(&self, value: T, attributes: Attributes) -> Option<Handle>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.add(value, attributes))
    }

    pub fn update<T>(
        &self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.update(handle, value, attributes))
    }

    pub fn touch<T>(&self, handle: Handle) -> Result<(), PolicyError>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.touch(handle))
    }

    pub fn remove<T>(&self, handle: Handle) -> Result<T, PolicyError>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.remove(handle))
    }

    pub fn evict_next<T>(&self) -> Option<T>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.evict_next())
    }

    pub fn evict_next_entry<T>(&self) -> Option<(T, Attributes)>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.evict_next_entry())
    }

    pub fn eviction_order<T>(&self) -> Vec<Handle>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.eviction_order())
    }

    pub fn get_cloned<T: Clone>(&self, handle: Handle) -> Result<T, PolicyError>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.get(handle).cloned())
    }

    pub fn peek_cloned<T: Clone>(&self) -> Option<T>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.peek().cloned())
    }

    pub fn peek_all_cloned<T: Clone>(&self) -> Vec<T>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.peek_all().into_iter().cloned().collect())
    }

    pub fn attributes<T>(&self, handle: Handle) -> Result<Attributes, PolicyError>
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.attributes(handle))
    }

    pub fn clear<T>(&self)
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.clear())
    }

    pub fn len<T>(&self) -> usize
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.len())
    }

    pub fn is_empty<T>(&self) -> bool
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.is_empty())
    }

    pub fn volume<T>(&self) -> u64
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.volume())
    }

    pub fn kind<T>(&self) -> PolicyKind
    where
        P: ReplacementPolicy<T>,
    {
        self.with(|p| p.kind())
    }
}

impl<P> From<P> for Locked<P> {
    fn from(inner: P) -> Self {
        Self::new(inner)
    }
}

impl<P: Default> Default for Locked<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: fmt::Debug> fmt::Debug for Locked<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(guard) => f.debug_struct("Locked").field("inner", &*guard).finish(),
            None => f.debug_struct("Locked").finish_non_exhaustive(),
        }
    }
}
