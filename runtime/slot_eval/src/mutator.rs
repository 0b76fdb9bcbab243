//! The mutator: set and clear against an instance's own store.
//!
//! Neither operation looks at the class or its fallbacks. Clearing a slot
//! is how an instance goes back to its class's behavior for that name.

use slot_ir::{StringInterner, RESERVED_PREFIX};
use slot_object::{reserved_name, Instance, ObjResult, Slot};

use crate::ObjectSpace;

pub(crate) fn set_slot(
    interner: &StringInterner,
    instance: &mut Instance,
    name: &str,
    slot: Slot,
) -> ObjResult<Slot> {
    check_slot_name(name)?;
    let name_id = interner.intern(name);
    tracing::trace!(name, callable = slot.is_callable(), "set slot");
    instance.store_mut().insert(name_id, slot.clone());
    Ok(slot)
}

/// Reject names the string call surface could never reach as slots.
pub(crate) fn check_slot_name(name: &str) -> ObjResult<()> {
    if name.starts_with(RESERVED_PREFIX) {
        return Err(reserved_name(name));
    }
    Ok(())
}

pub(crate) fn clear_slot(interner: &StringInterner, instance: &mut Instance, name: &str) -> Option<Slot> {
    // A name never interned was never stored
    let name_id = interner.get(name)?;
    let removed = instance.store_mut().remove(name_id);
    tracing::trace!(name, removed = removed.is_some(), "clear slot");
    removed
}

impl ObjectSpace {
    /// Store `slot` under `name` on `instance`, replacing any existing
    /// slot. Returns the assigned slot.
    ///
    /// A `Value::Callable` becomes a callable slot; any other value a
    /// literal one. Names starting with `_` are reserved for fallback calls
    /// and fail with `ReservedName`.
    pub fn set(&self, instance: &mut Instance, name: &str, slot: impl Into<Slot>) -> ObjResult<Slot> {
        set_slot(self.interner(), instance, name, slot.into())
    }

    /// Remove `name` from `instance`'s own store, returning the removed
    /// slot. Later resolution of `name` falls through to the class.
    pub fn clear(&self, instance: &mut Instance, name: &str) -> Option<Slot> {
        clear_slot(self.interner(), instance, name)
    }
}
