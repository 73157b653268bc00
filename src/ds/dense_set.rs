//! Handle-addressed set with a dense index for uniform sampling.
//!
//! Values live in a [`HandleArena`] next to their position in a dense
//! `Vec<Handle>`. Removal swaps the victim with the last dense slot and
//! patches the moved entry's position, so every operation stays O(1) and
//! `handle_at(i)` for `i in 0..len` always addresses a live element.
//!
//! ```text
//!   arena                                 dense: Vec<Handle>
//!   ┌────────┬─────────────────┐          ┌─────┬─────┬─────┬─────┐
//!   │ Handle │ (pos, value)    │          │  0  │  1  │  2  │  3  │
//!   ├────────┼─────────────────┤          ├─────┼─────┼─────┼─────┤
//!   │  h_a   │ (0, A)          │          │ h_a │ h_b │ h_c │ h_d │
//!   │  h_b   │ (1, B)          │          └─────┴─────┴─────┴─────┘
//!   │  h_c   │ (2, C)          │
//!   │  h_d   │ (3, D)          │          remove(h_b):
//!   └────────┴─────────────────┘            swap 1 ↔ 3, pop, h_d.pos = 1
//!                                           dense = [h_a, h_d, h_c]
//! ```
use crate::ds::handle_arena::{Handle, HandleArena};
use crate::error::PolicyError;

#[derive(Debug, Clone)]
struct Slot<T> {
    pos: usize,
    value: T,
}

/// Set of values with O(1) insert, remove and positional lookup.
#[derive(Debug, Clone)]
pub struct DenseSet<T> {
    arena: HandleArena<Slot<T>>,
    dense: Vec<Handle>,
}

impl<T> DenseSet<T> {
    /// Creates an empty, unbounded set.
    pub fn new() -> Self {
        Self::from_arena(HandleArena::new())
    }

    /// Creates an empty set with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: HandleArena::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
        }
    }

    /// Creates a set that refuses inserts beyond `limit` values.
    pub fn bounded(limit: usize) -> Self {
        Self::from_arena(HandleArena::bounded(limit))
    }

    fn from_arena(arena: HandleArena<Slot<T>>) -> Self {
        Self {
            arena,
            dense: Vec::new(),
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns `true` if `id` addresses a live value.
    pub fn contains(&self, id: Handle) -> bool {
        self.arena.contains(id)
    }

    /// Inserts `value`; hands it back when at the limit.
    pub fn insert(&mut self, value: T) -> Result<Handle, T> {
        let pos = self.dense.len();
        let id = self
            .arena
            .try_insert(Slot { pos, value })
            .map_err(|slot| slot.value)?;
        self.dense.push(id);
        Ok(id)
    }

    /// Removes `id`, moving the last dense entry into its position.
    pub fn remove(&mut self, id: Handle) -> Result<T, PolicyError> {
        let pos = self.arena.get(id)?.pos;
        self.dense.swap_remove(pos);
        if let Some(&moved) = self.dense.get(pos) {
            self.arena.get_mut(moved)?.pos = pos;
        }
        self.arena.remove(id).map(|slot| slot.value)
    }

    /// Handle stored at dense position `pos`.
    pub fn handle_at(&self, pos: usize) -> Option<Handle> {
        self.dense.get(pos).copied()
    }

    /// Dense handle array; position `i` is what `handle_at(i)` returns.
    pub fn handles(&self) -> &[Handle] {
        &self.dense
    }

    /// Returns a reference to the value behind `id`.
    pub fn get(&self, id: Handle) -> Result<&T, PolicyError> {
        self.arena.get(id).map(|slot| &slot.value)
    }

    /// Returns a mutable reference to the value behind `id`.
    pub fn get_mut(&mut self, id: Handle) -> Result<&mut T, PolicyError> {
        self.arena.get_mut(id).map(|slot| &mut slot.value)
    }

    /// Drops every value; outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.dense.clear();
    }

    /// Asserts that dense positions and arena slots agree.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.dense.len());
        for (pos, &id) in self.dense.iter().enumerate() {
            let slot = self.arena.get(id).expect("dense handle must be live");
            assert_eq!(slot.pos, pos);
        }
        self.arena.debug_validate_invariants();
    }
}

impl<T> Default for DenseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
