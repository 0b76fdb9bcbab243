//! The resolver: one call contract over own slots and class fallbacks.
//!
//! # Resolution Order
//!
//! 1. The instance's own slot. A literal is returned as is and the call
//!    arguments are ignored; a callable is invoked with the instance and
//!    the arguments, every time.
//! 2. The nearest fallback in the class's ancestor chain, invoked with the
//!    instance and the arguments.
//! 3. Nothing: `Ok(None)`.
//!
//! Explicit fallback calls skip step 1 and turn step 3 into a
//! `MissingFallback` error. Ancestor calls start step 2 above the class
//! whose fallback is running.

use slot_ir::{CallName, Name};
use slot_object::{
    arity_mismatch, missing_fallback, super_outside_fallback, Callable, ClassId, Instance,
    ObjError, ObjResult, Receiver, Slot, Value,
};

use crate::call_stack::{CallFrame, CallStack, FrameSource};
use crate::capability::Capability;
use crate::mutator;
use crate::stack::ensure_sufficient_stack;
use crate::ObjectSpace;

/// A live dispatch on one instance.
///
/// This is the `Receiver` handed to callables. Nested calls made through it
/// reborrow the same instance and call stack.
pub(crate) struct Dispatch<'a> {
    space: &'a ObjectSpace,
    instance: &'a mut Instance,
    stack: &'a mut CallStack,
    /// Class whose fallback is executing, for ancestor calls.
    running_fallback: Option<ClassId>,
}

impl<'a> Dispatch<'a> {
    pub(crate) fn new(
        space: &'a ObjectSpace,
        instance: &'a mut Instance,
        stack: &'a mut CallStack,
    ) -> Self {
        Dispatch {
            space,
            instance,
            stack,
            running_fallback: None,
        }
    }

    /// Public resolution of `name`.
    pub(crate) fn resolve_public(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        // Every slot and fallback name is interned, so an unknown string
        // cannot be defined anywhere.
        let Some(name_id) = self.space.interner().get(name) else {
            tracing::trace!(name, "unknown name resolves to empty");
            return Ok(None);
        };
        self.resolve_name(name_id, args)
    }

    fn resolve_name(&mut self, name: Name, args: &[Value]) -> ObjResult<Option<Value>> {
        let class = self.instance.class();

        if let Some(slot) = self.instance.store().get(name) {
            self.space.note_own_slot(class, name);
            return match slot {
                Slot::Literal(value) => Ok(Some(value.clone())),
                Slot::Callable(callable) => {
                    let callable = callable.clone();
                    self.invoke(&callable, name, None, args)
                }
            };
        }

        match self.space.find_fallback(class, name)? {
            Some(hit) => self.invoke(&hit.callable, name, Some(hit.defined_in), args),
            None => {
                tracing::trace!(name = self.space.interner().lookup(name), "resolution miss");
                Ok(None)
            }
        }
    }

    /// Explicit fallback call from the instance's class.
    pub(crate) fn invoke_internal(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        let class = self.instance.class();
        let hit = match self.space.interner().get(name) {
            Some(name_id) => self
                .space
                .find_fallback(class, name_id)?
                .map(|hit| (name_id, hit)),
            None => None,
        };

        match hit {
            Some((name_id, hit)) => self.invoke(&hit.callable, name_id, Some(hit.defined_in), args),
            None => {
                let err = missing_fallback(name, &self.space.class_label(class));
                Err(self.attach_trace(err))
            }
        }
    }

    /// Ancestor call: the nearest fallback strictly above the running one.
    fn invoke_ancestor(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        let Some(current) = self.running_fallback else {
            return Err(self.attach_trace(super_outside_fallback(name)));
        };

        let hit = match self.space.interner().get(name) {
            Some(name_id) => self
                .space
                .find_above(current, name_id)
                .map(|hit| (name_id, hit)),
            None => None,
        };

        match hit {
            Some((name_id, hit)) => self.invoke(&hit.callable, name_id, Some(hit.defined_in), args),
            None => {
                let above = self.space.parent_of(current).unwrap_or(current);
                let err = missing_fallback(name, &self.space.class_label(above));
                Err(self.attach_trace(err))
            }
        }
    }

    /// Invoke a callable with this dispatch's instance as receiver.
    pub(crate) fn invoke(
        &mut self,
        callable: &Callable,
        name: Name,
        running_fallback: Option<ClassId>,
        args: &[Value],
    ) -> ObjResult<Option<Value>> {
        let source = running_fallback.map_or(FrameSource::Slot, FrameSource::Fallback);
        if let Err(err) = self.stack.push(CallFrame { name, source }) {
            return Err(self.attach_trace(err));
        }
        tracing::trace!(
            name = self.space.interner().lookup(name),
            depth = self.stack.depth(),
            ?source,
            "invoke"
        );

        let result = ensure_sufficient_stack(|| {
            let mut nested = Dispatch {
                space: self.space,
                instance: &mut *self.instance,
                stack: &mut *self.stack,
                running_fallback,
            };
            callable.call(&mut nested, args)
        });

        let result = result.map_err(|err| self.attach_trace(err));
        self.stack.pop();
        result
    }

    /// Snapshot the call stack onto an error that has no trace yet.
    fn attach_trace(&self, err: ObjError) -> ObjError {
        if err.trace.is_some() {
            return err;
        }
        let trace = self
            .stack
            .capture(self.space.interner(), |id| self.space.class_label(id));
        err.with_backtrace(trace)
    }
}

impl Receiver for Dispatch<'_> {
    fn class(&self) -> ClassId {
        self.instance.class()
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        let name = self.space.interner().get(name)?;
        self.instance.store().get(name)
    }

    fn get(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        self.resolve_public(name, args)
    }

    fn call_fallback(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        self.invoke_internal(name, args)
    }

    fn call_super(&mut self, name: &str, args: &[Value]) -> ObjResult<Option<Value>> {
        self.invoke_ancestor(name, args)
    }

    fn set(&mut self, name: &str, slot: Slot) -> ObjResult<Slot> {
        mutator::set_slot(self.space.interner(), self.instance, name, slot)
    }

    fn clear(&mut self, name: &str) -> Option<Slot> {
        mutator::clear_slot(self.space.interner(), self.instance, name)
    }

    fn can(&self, name: &str) -> bool {
        matches!(self.space.can(&*self.instance, name), Ok(Some(_)))
    }
}

impl ObjectSpace {
    /// Resolve `name` on `instance`: own slot, then the class's fallback
    /// chain, else `Ok(None)`.
    ///
    /// Errors only come from callables that ran (including explicit
    /// fallback calls they made) or from an unregistered class.
    pub fn resolve(
        &self,
        instance: &mut Instance,
        name: &str,
        args: &[Value],
    ) -> ObjResult<Option<Value>> {
        self.with_dispatch(instance, |dispatch| dispatch.resolve_public(name, args))
    }

    /// Explicit fallback call: skips own slots, and fails with
    /// `MissingFallback` if no class in the chain defines `name`.
    pub fn invoke_fallback(
        &self,
        instance: &mut Instance,
        name: &str,
        args: &[Value],
    ) -> ObjResult<Option<Value>> {
        self.with_dispatch(instance, |dispatch| dispatch.invoke_internal(name, args))
    }

    /// Dynamic call surface.
    ///
    /// - `name`: [`ObjectSpace::resolve`]
    /// - `name_SET`: [`ObjectSpace::set`] with the single argument;
    ///   returns the assigned value
    /// - `name_CLEAR`: [`ObjectSpace::clear`]; returns the removed value
    /// - `_name`: [`ObjectSpace::invoke_fallback`]
    pub fn call(
        &self,
        instance: &mut Instance,
        raw_name: &str,
        args: &[Value],
    ) -> ObjResult<Option<Value>> {
        match CallName::parse(raw_name) {
            CallName::Get(name) => self.resolve(instance, name, args),
            CallName::Set(name) => match args {
                [value] => Ok(Some(self.set(instance, name, value.clone())?.into_value())),
                _ => Err(arity_mismatch(raw_name, 1, args.len())),
            },
            CallName::Clear(name) => Ok(self.clear(instance, name).map(Slot::into_value)),
            CallName::Fallback(name) => self.invoke_fallback(instance, name, args),
        }
    }

    /// Capability query: does `name` resolve on `instance`, and to what.
    ///
    /// Returns `Ok(None)` where `resolve` would return empty without
    /// running anything, and the same `UnknownClass` error `resolve` gives
    /// when the lookup reaches an unregistered class.
    pub fn can(&self, instance: &Instance, name: &str) -> ObjResult<Option<Capability>> {
        let Some(name_id) = self.interner().get(name) else {
            return Ok(None);
        };
        if let Some(slot) = instance.store().get(name_id) {
            return Ok(Some(Capability::own_slot(name_id, slot.clone())));
        }
        Ok(self
            .find_fallback(instance.class(), name_id)?
            .map(|hit| Capability::fallback(name_id, hit)))
    }
}

#[cfg(test)]
mod tests;
