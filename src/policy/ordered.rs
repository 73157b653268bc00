//! Shared storage for the list-ordered policies (LRU, MRU, FIFO, LIFO).
//!
//! Elements are appended at the back of an [`IntrusiveList`]. The policies
//! differ only in whether `touch` moves an element to the back and which end
//! `evict_next` pops from.
//!
//! ```text
//!   front (oldest / least recent)                 back (newest / most recent)
//!     │                                                              │
//!     ▼                                                              ▼
//!   [h_0] ◄──► [h_1] ◄──► [h_2] ◄──► [h_3] ◄── add() appends here
//!
//!   LRU, FIFO: evict from front      MRU, LIFO: evict from back
//! ```
use crate::attributes::Attributes;
use crate::ds::{Handle, IntrusiveList};
use crate::error::PolicyError;
use crate::policy::Entry;

#[derive(Debug, Clone)]
pub(crate) struct OrderedCore<T> {
    list: IntrusiveList<Entry<T>>,
    volume: u64,
}

impl<T> OrderedCore<T> {
    pub(crate) fn with_capacity(hint: usize) -> Self {
        Self::from_list(IntrusiveList::with_capacity(hint))
    }

    pub(crate) fn bounded(limit: usize) -> Self {
        Self::from_list(IntrusiveList::bounded(limit))
    }

    fn from_list(list: IntrusiveList<Entry<T>>) -> Self {
        Self { list, volume: 0 }
    }

    pub(crate) fn push_back(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        let handle = self.list.push_back(Entry::new(value, attributes)).ok()?;
        self.volume = self.volume.saturating_add(attributes.size());
        Some(handle)
    }

    pub(crate) fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        let entry = self.list.get_mut(handle)?;
        let old = std::mem::replace(entry, Entry::new(value, attributes));
        self.volume = self
            .volume
            .saturating_sub(old.attributes.size())
            .saturating_add(attributes.size());
        Ok(old.value)
    }

    pub(crate) fn move_to_back(&mut self, handle: Handle) -> Result<(), PolicyError> {
        self.list.move_to_back(handle)
    }

    /// Validates `handle` without reordering.
    pub(crate) fn check(&self, handle: Handle) -> Result<(), PolicyError> {
        self.list.get(handle).map(|_| ())
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        let entry = self.list.remove(handle)?;
        Ok(self.account_removal(entry).0)
    }

    pub(crate) fn pop_front(&mut self) -> Option<(T, Attributes)> {
        let entry = self.list.pop_front()?;
        Some(self.account_removal(entry))
    }

    pub(crate) fn pop_back(&mut self) -> Option<(T, Attributes)> {
        let entry = self.list.pop_back()?;
        Some(self.account_removal(entry))
    }

    fn account_removal(&mut self, entry: Entry<T>) -> (T, Attributes) {
        self.volume = self.volume.saturating_sub(entry.attributes.size());
        entry.into_parts()
    }

    pub(crate) fn front(&self) -> Option<&T> {
        self.list.front().map(|entry| &entry.value)
    }

    pub(crate) fn back(&self) -> Option<&T> {
        self.list.back().map(|entry| &entry.value)
    }

    pub(crate) fn ids_front_to_back(&self) -> Vec<Handle> {
        self.list.iter_ids().collect()
    }

    pub(crate) fn ids_back_to_front(&self) -> Vec<Handle> {
        self.list.iter_ids_rev().collect()
    }

    pub(crate) fn values_front_to_back(&self) -> Vec<&T> {
        self.list.iter().map(|entry| &entry.value).collect()
    }

    pub(crate) fn values_back_to_front(&self) -> Vec<&T> {
        self.list.iter_rev().map(|entry| &entry.value).collect()
    }

    pub(crate) fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        self.list.get(handle).map(|entry| &entry.value)
    }

    pub(crate) fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        self.list.get(handle).map(|entry| entry.attributes)
    }

    pub(crate) fn clear(&mut self) {
        self.list.clear();
        self.volume = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub(crate) fn volume(&self) -> u64 {
        self.volume
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        let volume = self
            .list
            .iter()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.attributes.size()));
        assert_eq!(volume, self.volume);
    }
}
