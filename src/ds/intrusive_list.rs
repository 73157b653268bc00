//! Intrusive doubly linked list backed by [`HandleArena`].
//!
//! Stores list nodes in a `HandleArena` and links them by [`Handle`], giving
//! callers stable handles and O(1) splice/move operations without pointers.
//! The recency and order policies (LRU, MRU, FIFO, LIFO) and the clock ring
//! are all built on it.
//!
//! ## Architecture
//!
//! ```text
//!   arena (HandleArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ Handle │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ h_1    │ { value: A, prev: None, next: Some(h_2) }   │
//!   │ h_2    │ { value: B, prev: Some(h_1), next: h_3 }    │
//!   │ h_3    │ { value: C, prev: Some(h_2), next: None }   │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [h_1] ◄──► [h_2] ◄──► [h_3] ◄── tail
//! ```
//!
//! ## Operations
//! - `move_to_front(h)`: detach + attach to head
//! - `move_to_back(h)`: detach + attach to tail
//! - `insert_before(anchor, v)`: splice a new node in front of `anchor`
//! - `remove(h)`: detach + free slot in arena (unlink first, then free)
//!
//! ## Performance
//! - `push_front` / `push_back` / `insert_before`: O(1)
//! - `pop_front` / `pop_back` / `remove`: O(1)
//! - `move_to_front` / `move_to_back`: O(1)
//! - `iter` / `iter_rev`: O(n)
//!
//! `debug_validate_invariants()` is available in debug/test builds.
use crate::ds::handle_arena::{Handle, HandleArena};
use crate::error::PolicyError;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// Intrusive list that stores nodes in a `HandleArena` and links them via `Handle`.
#[derive(Debug, Clone)]
pub struct IntrusiveList<T> {
    arena: HandleArena<Node<T>>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty, unbounded list.
    pub fn new() -> Self {
        Self::from_arena(HandleArena::new())
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(HandleArena::with_capacity(capacity))
    }

    /// Creates an empty list that refuses pushes beyond `limit` nodes.
    pub fn bounded(limit: usize) -> Self {
        Self::from_arena(HandleArena::bounded(limit))
    }

    fn from_arena(arena: HandleArena<Node<T>>) -> Self {
        Self {
            arena,
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the node limit (`usize::MAX` when unbounded).
    pub fn limit(&self) -> usize {
        self.arena.limit()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: Handle) -> bool {
        self.arena.contains(id)
    }

    /// Returns the value at the front of the list.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id).ok())
    }

    /// Returns the handle at the front of the list.
    pub fn front_id(&self) -> Option<Handle> {
        self.head
    }

    /// Returns the value at the back of the list.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id).ok())
    }

    /// Returns the handle at the back of the list.
    pub fn back_id(&self) -> Option<Handle> {
        self.tail
    }

    /// Returns the handle after `id`, if any.
    pub fn next_id(&self, id: Handle) -> Result<Option<Handle>, PolicyError> {
        self.arena.get(id).map(|node| node.next)
    }

    /// Returns the handle after `id`, wrapping from the tail to the head.
    pub fn next_id_cyclic(&self, id: Handle) -> Result<Handle, PolicyError> {
        let next = self.next_id(id)?;
        Ok(next.or(self.head).unwrap_or(id))
    }

    /// Returns an iterator from front to back.
    pub fn iter(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            list: self,
            current: self.head,
            forward: true,
        }
    }

    /// Returns an iterator from back to front.
    pub fn iter_rev(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            list: self,
            current: self.tail,
            forward: false,
        }
    }

    /// Returns an iterator of handles from front to back.
    pub fn iter_ids(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter_entries().map(|(id, _)| id)
    }

    /// Returns an iterator of handles from back to front.
    pub fn iter_ids_rev(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter_rev().entries().map(|(id, _)| id)
    }

    /// Returns an iterator of `(Handle, &T)` from front to back.
    pub fn iter_entries(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.iter().entries()
    }

    /// Returns the value for a node, or `InvalidHandle`.
    pub fn get(&self, id: Handle) -> Result<&T, PolicyError> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to a node value, or `InvalidHandle`.
    pub fn get_mut(&mut self, id: Handle) -> Result<&mut T, PolicyError> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts a new node at the front. Hands the value back when full.
    pub fn push_front(&mut self, value: T) -> Result<Handle, T> {
        let id = self
            .arena
            .try_insert(Node {
                value,
                prev: None,
                next: None,
            })
            .map_err(|node| node.value)?;
        self.attach_front(id);
        Ok(id)
    }

    /// Inserts a new node at the back. Hands the value back when full.
    pub fn push_back(&mut self, value: T) -> Result<Handle, T> {
        let id = self
            .arena
            .try_insert(Node {
                value,
                prev: None,
                next: None,
            })
            .map_err(|node| node.value)?;
        self.attach_back(id);
        Ok(id)
    }

    /// Inserts a new node directly in front of `anchor`.
    ///
    /// Returns `Ok(Err(value))` when the list is full and `Err` when
    /// `anchor` is not a live node.
    pub fn insert_before(
        &mut self,
        anchor: Handle,
        value: T,
    ) -> Result<Result<Handle, T>, PolicyError> {
        let prev = self.arena.get(anchor)?.prev;
        let id = match self.arena.try_insert(Node {
            value,
            prev,
            next: Some(anchor),
        }) {
            Ok(id) => id,
            Err(node) => return Ok(Err(node.value)),
        };
        match prev {
            Some(prev_id) => self.arena.get_mut(prev_id)?.next = Some(id),
            None => self.head = Some(id),
        }
        self.arena.get_mut(anchor)?.prev = Some(id);
        Ok(Ok(id))
    }

    /// Removes and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id).ok()
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id).ok()
    }

    /// Unlinks node `id`, frees its slot, and returns its value.
    pub fn remove(&mut self, id: Handle) -> Result<T, PolicyError> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front.
    pub fn move_to_front(&mut self, id: Handle) -> Result<(), PolicyError> {
        if Some(id) == self.head {
            return self.arena.get(id).map(|_| ());
        }
        self.detach(id)?;
        self.attach_front(id);
        Ok(())
    }

    /// Moves an existing node to the back.
    pub fn move_to_back(&mut self, id: Handle) -> Result<(), PolicyError> {
        if Some(id) == self.tail {
            return self.arena.get(id).map(|_| ());
        }
        self.detach(id)?;
        self.attach_back(id);
        Ok(())
    }

    /// Clears the list and frees all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns the list order as handles from head to tail.
    pub fn debug_snapshot_ids(&self) -> Vec<Handle> {
        self.iter_ids().collect()
    }

    fn detach(&mut self, id: Handle) -> Result<(), PolicyError> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => self.arena.get_mut(prev_id)?.next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.arena.get_mut(next_id)?.prev = prev,
            None => self.tail = prev,
        }

        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = None;
        Ok(())
    }

    fn attach_front(&mut self, id: Handle) {
        let old_head = self.head;
        if let Ok(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.arena.get_mut(h).ok()) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn attach_back(&mut self, id: Handle) {
        let old_tail = self.tail;
        if let Ok(node) = self.arena.get_mut(id) {
            node.next = None;
            node.prev = old_tail;
        }
        match old_tail.and_then(|t| self.arena.get_mut(t).ok()) {
            Some(tail_node) => tail_node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            assert!(seen.insert(id));
            let node = self.arena.get(id).expect("node missing");
            assert_eq!(node.prev, prev);
            if let Some(next_id) = node.next {
                let next_node = self.arena.get(next_id).expect("next node missing");
                assert_eq!(next_node.prev, Some(id));
            } else {
                assert_eq!(self.tail, Some(id));
            }

            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
        self.arena.debug_validate_invariants();
    }
}

/// Iterator over list values in either direction.
pub struct IntrusiveListIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<Handle>,
    forward: bool,
}

impl<'a, T> IntrusiveListIter<'a, T> {
    /// Turns this iterator into one over `(Handle, &T)` pairs.
    pub fn entries(self) -> IntrusiveListEntryIter<'a, T> {
        IntrusiveListEntryIter { inner: self }
    }

    fn step(&mut self) -> Option<(Handle, &'a T)> {
        let id = self.current?;
        let node = self.list.arena.get(id).ok()?;
        self.current = if self.forward { node.next } else { node.prev };
        Some((id, &node.value))
    }
}

impl<'a, T> Iterator for IntrusiveListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().map(|(_, value)| value)
    }
}

/// Iterator over `(Handle, &T)` pairs.
pub struct IntrusiveListEntryIter<'a, T> {
    inner: IntrusiveListIter<'a, T>,
}

impl<'a, T> Iterator for IntrusiveListEntryIter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.step()
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}
