//! Object instances.

use crate::{ClassId, InstanceStore};

/// An object: its own slots plus a link to the class that supplies
/// fallbacks.
///
/// Instances are single-owner values; dispatch borrows them mutably for the
/// duration of a call. Build them through `ObjectSpace::build` so deferred
/// construction calls run; `Instance::new` gives a bare, empty instance.
#[derive(Clone, Debug)]
pub struct Instance {
    class: ClassId,
    store: InstanceStore,
}

impl Instance {
    /// Create an empty instance linked to `class`.
    pub fn new(class: ClassId) -> Self {
        Self::with_store(class, InstanceStore::new())
    }

    /// Create an instance from a pre-populated store.
    pub fn with_store(class: ClassId, store: InstanceStore) -> Self {
        Instance { class, store }
    }

    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut InstanceStore {
        &mut self.store
    }
}
