//! Per-instance slot storage.

use rustc_hash::FxHashMap;
use slot_ir::Name;

use crate::Slot;

/// Mapping from slot name to slot contents, owned by one instance.
///
/// The store knows nothing about classes or fallbacks; it is the only state
/// the mutator touches.
#[derive(Clone, Debug, Default)]
pub struct InstanceStore {
    slots: FxHashMap<Name, Slot>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Slot> {
        self.slots.get(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.slots.contains_key(&name)
    }

    /// Store a slot, returning the one it replaced.
    pub fn insert(&mut self, name: Name, slot: Slot) -> Option<Slot> {
        self.slots.insert(name, slot)
    }

    /// Remove a slot, returning it if present.
    pub fn remove(&mut self, name: Name) -> Option<Slot> {
        self.slots.remove(&name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.slots.keys().copied()
    }
}
