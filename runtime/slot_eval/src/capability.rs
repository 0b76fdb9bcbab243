//! Capability lookup: which class in the chain, if any, defines a fallback.

use slot_ir::Name;
use slot_object::{unknown_class, Callable, ClassId, ClassRegistry, Instance, ObjResult, Slot, Value};

use crate::cache::Strategy;
use crate::resolver::Dispatch;
use crate::ObjectSpace;

/// A fallback found by `probe`.
#[derive(Clone, Debug)]
pub struct FallbackHit {
    pub callable: Callable,
    pub defined_in: ClassId,
}

impl FallbackHit {
    pub(crate) fn strategy(&self) -> Strategy {
        Strategy::Fallback {
            defined_in: self.defined_in,
        }
    }
}

/// Walk `class`'s ancestor chain nearest-first and return the first
/// fallback named `name`.
///
/// Pure function of the registry. Fails only if `class` is not registered.
pub fn probe(registry: &ClassRegistry, class: ClassId, name: Name) -> ObjResult<Option<FallbackHit>> {
    let chain = registry
        .ancestors(class)
        .ok_or_else(|| unknown_class(class.raw()))?;
    Ok(probe_chain(registry, chain, name))
}

/// Probe an explicit slice of a chain. Used for ancestor dispatch, which
/// starts part way up.
pub(crate) fn probe_chain(
    registry: &ClassRegistry,
    chain: &[ClassId],
    name: Name,
) -> Option<FallbackHit> {
    chain.iter().find_map(|&id| {
        registry
            .get(id)
            .and_then(|class| class.fallback(name))
            .map(|callable| FallbackHit {
                callable: callable.clone(),
                defined_in: id,
            })
    })
}

/// Where a capability is satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilitySource {
    OwnSlot,
    Fallback { defined_in: ClassId },
}

/// Answer to `can`: the name resolves, and this is what it resolves to.
///
/// The handle captures the target at query time. Invoking it behaves like
/// `resolve` did at that moment, even if the instance's slots change later.
#[derive(Clone, Debug)]
pub struct Capability {
    name: Name,
    source: CapabilitySource,
    target: Slot,
}

impl Capability {
    pub(crate) fn own_slot(name: Name, slot: Slot) -> Self {
        Capability {
            name,
            source: CapabilitySource::OwnSlot,
            target: slot,
        }
    }

    pub(crate) fn fallback(name: Name, hit: FallbackHit) -> Self {
        Capability {
            name,
            source: CapabilitySource::Fallback {
                defined_in: hit.defined_in,
            },
            target: Slot::Callable(hit.callable),
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn source(&self) -> CapabilitySource {
        self.source
    }

    /// Invoke against `instance`.
    ///
    /// A literal target returns its value; a callable target runs with
    /// `instance` as its receiver.
    pub fn invoke(
        &self,
        space: &ObjectSpace,
        instance: &mut Instance,
        args: &[Value],
    ) -> ObjResult<Option<Value>> {
        match &self.target {
            Slot::Literal(value) => Ok(Some(value.clone())),
            Slot::Callable(callable) => {
                let running_fallback = match self.source {
                    CapabilitySource::OwnSlot => None,
                    CapabilitySource::Fallback { defined_in } => Some(defined_in),
                };
                space.with_dispatch(instance, |dispatch: &mut Dispatch<'_>| {
                    dispatch.invoke(callable, self.name, running_fallback, args)
                })
            }
        }
    }

    /// Bind to an instance, giving a handle that only needs arguments.
    pub fn bind<'a>(self, space: &'a ObjectSpace, instance: &'a mut Instance) -> BoundCapability<'a> {
        BoundCapability {
            capability: self,
            space,
            instance,
        }
    }
}

/// A capability bound to its instance.
pub struct BoundCapability<'a> {
    capability: Capability,
    space: &'a ObjectSpace,
    instance: &'a mut Instance,
}

impl BoundCapability<'_> {
    pub fn call(&mut self, args: &[Value]) -> ObjResult<Option<Value>> {
        self.capability.invoke(self.space, self.instance, args)
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }
}

#[cfg(test)]
mod tests;
