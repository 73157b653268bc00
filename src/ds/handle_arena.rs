//! Index-addressed slot store with free-list recycling.
//!
//! Every policy keeps its elements in a `HandleArena`. Slots are addressed by
//! [`Handle`]s: a slot index plus the generation the slot had when the value
//! was stored. Freeing a slot bumps its generation, so a handle that outlives
//! its element is rejected even after the slot has been recycled.
//!
//! ## Architecture
//!
//! ```text
//!   slots: Vec<Slot<T>>                       free_list: Vec<u32>
//!   ┌───────┬────────────┬──────────────┐      ┌─────┐
//!   │ index │ generation │ value        │      │  1  │ ◄── next insert reuses 1
//!   ├───────┼────────────┼──────────────┤      └─────┘
//!   │   0   │     0      │ Some("a")    │ ◄── Handle { index: 0, gen: 0 }
//!   │   1   │     1      │ None         │     (stale: Handle { index: 1, gen: 0 })
//!   │   2   │     0      │ Some("c")    │ ◄── Handle { index: 2, gen: 0 }
//!   └───────┴────────────┴──────────────┘
//! ```
//!
//! ## Performance
//! - `insert` / `try_insert`: O(1) amortized (reuses a free slot or appends)
//! - `remove`: O(1)
//! - `get` / `get_mut` / `replace`: O(1)
//! - `clear`: O(n), generations of every slot are bumped
//!
//! Growth only appends slots; it never moves an existing index.
use crate::error::PolicyError;

const GENERATION_MASK: u32 = (1 << 31) - 1;

/// Stable reference to an element stored in a policy.
///
/// A handle stays valid until its element is removed, evicted or cleared.
/// The raw form ([`into_raw`](Self::into_raw)) is always a non-negative
/// integer, so handles can cross boundaries that only carry integers.
///
/// # Example
///
/// ```
/// use evictkit::ds::{Handle, HandleArena};
///
/// let mut arena = HandleArena::new();
/// let h = arena.insert("value").unwrap();
/// let raw = h.into_raw();
/// assert!(raw >= 0);
/// assert_eq!(Handle::from_raw(raw), Ok(h));
/// assert!(Handle::from_raw(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index this handle addresses.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the slot generation captured when the handle was issued.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a non-negative integer.
    #[inline]
    pub fn into_raw(self) -> i64 {
        (i64::from(self.generation) << 32) | i64::from(self.index)
    }

    /// Rebuilds a handle from [`into_raw`](Self::into_raw) output.
    ///
    /// Negative values are rejected with [`PolicyError::InvalidHandle`].
    /// A well-formed but stale value still fails later, when used.
    pub fn from_raw(raw: i64) -> Result<Self, PolicyError> {
        if raw < 0 {
            return Err(PolicyError::InvalidHandle(raw));
        }
        let index = (raw & 0xFFFF_FFFF) as u32;
        let generation = (raw >> 32) as u32;
        if generation > GENERATION_MASK {
            return Err(PolicyError::InvalidHandle(i64::from(index)));
        }
        Ok(Self { index, generation })
    }

    #[inline]
    pub(crate) fn invalid(self) -> PolicyError {
        PolicyError::InvalidHandle(i64::from(self.index))
    }
}

impl TryFrom<i64> for Handle {
    type Error = PolicyError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Handle::from_raw(raw)
    }
}

/// Index for a slot appended after `len` existing ones, if it fits a handle.
#[inline]
fn next_index(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Resizable slot store addressed by [`Handle`].
///
/// Optionally carries a hard slot limit; [`try_insert`](Self::try_insert)
/// refuses values once `len() == limit`.
#[derive(Debug, Clone)]
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
    limit: usize,
}

impl<T> HandleArena<T> {
    /// Creates an empty, unbounded arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            limit: usize::MAX,
        }
    }

    /// Creates an empty arena with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
            limit: usize::MAX,
        }
    }

    /// Creates an arena that holds at most `limit` live values.
    pub fn bounded(limit: usize) -> Self {
        let mut arena = Self::with_capacity(limit.min(1024));
        arena.limit = limit;
        arena
    }

    /// Returns the hard slot limit (`usize::MAX` when unbounded).
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` once `len()` reaches the slot limit.
    pub fn is_full(&self) -> bool {
        self.len >= self.limit
    }

    /// Stores `value`, ignoring the slot limit.
    ///
    /// Hands the value back only when every `u32` slot index is in use.
    pub fn insert(&mut self, value: T) -> Result<Handle, T> {
        let handle = if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.value = Some(value);
            Handle::new(idx, slot.generation)
        } else {
            let Some(idx) = next_index(self.slots.len()) else {
                return Err(value);
            };
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Handle::new(idx, 0)
        };
        self.len += 1;
        Ok(handle)
    }

    /// Stores `value` unless the arena is at its limit or out of slot
    /// indices, in which case the value is handed back.
    pub fn try_insert(&mut self, value: T) -> Result<Handle, T> {
        if self.is_full() {
            return Err(value);
        }
        self.insert(value)
    }

    /// Frees the slot addressed by `handle` and returns its value.
    pub fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .ok_or_else(|| handle.invalid())?;
        let value = slot.value.take().ok_or_else(|| handle.invalid())?;
        slot.generation = (slot.generation + 1) & GENERATION_MASK;
        self.free_list.push(handle.index);
        self.len -= 1;
        Ok(value)
    }

    /// Returns a reference to the value behind `handle`.
    pub fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or_else(|| handle.invalid())
    }

    /// Returns a mutable reference to the value behind `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T, PolicyError> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or_else(|| handle.invalid())
    }

    /// Swaps in `value` and returns the previous one; the handle stays valid.
    pub fn replace(&mut self, handle: Handle, value: T) -> Result<T, PolicyError> {
        let slot = self.get_mut(handle)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Returns `true` if `handle` addresses a live value.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_ok()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots allocated so far (live + free).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Frees every slot. Handles issued before the call stay invalid.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = (slot.generation + 1) & GENERATION_MASK;
            }
            self.free_list.push(idx as u32);
        }
        self.len = 0;
    }

    /// Iterates live values with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(idx as u32, slot.generation), value))
        })
    }

    /// Asserts that the live count and free list match the slots.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let live = self.slots.iter().filter(|slot| slot.value.is_some()).count();
        assert_eq!(self.len, live);
        assert_eq!(self.len + self.free_list.len(), self.slots.len());
        for &idx in &self.free_list {
            assert!(self.slots[idx as usize].value.is_none());
        }
    }
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
