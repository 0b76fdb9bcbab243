//! The receiver seam between callables and the dispatcher.

use crate::{ClassId, ObjResult, Slot, Value};

/// The object a callable or fallback was invoked on.
///
/// Implemented by the dispatcher's call frame. Callables receive
/// `&mut dyn Receiver` and use it the way methods use `self`: read sibling
/// names, call class fallbacks, or change the instance's own slots. Every
/// method acts on the same instance the outer call targeted.
pub trait Receiver {
    /// The instance's class.
    fn class(&self) -> ClassId;

    /// Borrow an own slot without invoking it.
    fn slot(&self, name: &str) -> Option<&Slot>;

    /// Public resolution: own slot, then fallback chain, else `Ok(None)`.
    fn get(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>>;

    /// Explicit fallback call from the instance's class, skipping own
    /// slots. Fails with `MissingFallback` if no class in the chain
    /// defines `name`.
    fn call_fallback(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>>;

    /// Ancestor call from inside a running fallback: searches strictly
    /// above the class that defined it.
    fn call_super(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>>;

    /// Store a slot on the instance, returning the assigned slot.
    ///
    /// Fails with `ReservedName` if `name` starts with the reserved prefix.
    fn set(&mut self, name: &str, slot: Slot) -> ObjResult<Slot>;

    /// Remove an own slot, returning it if present.
    fn clear(&mut self, name: &str) -> Option<Slot>;

    /// Whether `name` would resolve (own slot or fallback). A lookup that
    /// fails answers `false`.
    fn can(&self, name: &str) -> bool;

    /// Resolve `name` and require a string result.
    ///
    /// Empty results and non-strings are reported as `TypeMismatch`.
    fn get_str(&mut self, name: &str) -> ObjResult<String> {
        match self.get(name, &[])? {
            Some(Value::Str(s)) => Ok(s.to_string()),
            Some(other) => Err(crate::type_mismatch("str", other.type_name())),
            None => Err(crate::type_mismatch("str", "empty")),
        }
    }
}
