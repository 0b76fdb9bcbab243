//! Class registry.
//!
//! Owns every class of an object space and the linear ancestor chain of
//! each. Chains are computed once at registration (self first, then parent,
//! grandparent, ...) since a class's parent never changes.
//!
//! The registry carries an epoch that changes whenever fallback lookup
//! could answer differently: a class is registered or a fallback is added.
//! Caches layered on top compare epochs to know when to drop their entries.

use rustc_hash::FxHashMap;
use slot_ir::{Name, StringInterner};
use smallvec::SmallVec;

use crate::{
    duplicate_class, unknown_class, Callable, Class, ClassBuilder, ClassId, ObjError, ObjResult,
};

/// Ancestor chain, nearest first. Most hierarchies are shallow.
type Chain = SmallVec<[ClassId; 8]>;

struct ClassEntry {
    class: Class,
    chain: Chain,
}

/// All classes known to one object space.
#[derive(Default)]
pub struct ClassRegistry {
    entries: Vec<ClassEntry>,
    by_name: FxHashMap<Name, ClassId>,
    epoch: u64,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, returning its id.
    ///
    /// Fails if the name is taken or the parent id is unknown.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %builder.name()))]
    pub fn register(
        &mut self,
        builder: ClassBuilder,
        interner: &StringInterner,
    ) -> ObjResult<ClassId> {
        let name = interner.intern(&builder.name);
        if self.by_name.contains_key(&name) {
            return Err(duplicate_class(&builder.name));
        }

        let raw = u32::try_from(self.entries.len())
            .map_err(|_| ObjError::new("class registry is full"))?;
        let id = ClassId::new(raw);

        let mut chain = Chain::new();
        chain.push(id);
        if let Some(parent) = builder.parent {
            let parent_chain = self.ancestors(parent).ok_or_else(|| unknown_class(parent.raw()))?;
            chain.extend_from_slice(parent_chain);
        }

        let fallbacks = builder
            .fallbacks
            .into_iter()
            .map(|(fallback, callable)| (interner.intern(&fallback), callable))
            .collect();

        tracing::debug!(%id, depth = chain.len(), "registered class");
        self.entries.push(ClassEntry {
            class: Class::new(id, name, builder.parent, fallbacks),
            chain,
        });
        self.by_name.insert(name, id);
        self.bump_epoch();
        Ok(id)
    }

    /// Add or replace a fallback on an already registered class.
    ///
    /// Instances of the class and of every subclass see the new fallback on
    /// their next miss. Returns the fallback it replaced.
    pub fn add_fallback(
        &mut self,
        id: ClassId,
        name: Name,
        callable: Callable,
    ) -> ObjResult<Option<Callable>> {
        let entry = self
            .entries
            .get_mut(id.index())
            .ok_or_else(|| unknown_class(id.raw()))?;
        let previous = entry.class.insert_fallback(name, callable);
        self.bump_epoch();
        Ok(previous)
    }

    #[inline]
    pub fn get(&self, id: ClassId) -> Option<&Class> {
        self.entries.get(id.index()).map(|entry| &entry.class)
    }

    /// Look up a class by its interned name.
    pub fn lookup(&self, name: Name) -> Option<ClassId> {
        self.by_name.get(&name).copied()
    }

    /// The class followed by its ancestors, nearest first.
    #[inline]
    pub fn ancestors(&self, id: ClassId) -> Option<&[ClassId]> {
        self.entries.get(id.index()).map(|entry| entry.chain.as_slice())
    }

    /// Whether `id` is `ancestor` or inherits from it.
    pub fn inherits(&self, id: ClassId, ancestor: ClassId) -> bool {
        self.ancestors(id)
            .is_some_and(|chain| chain.contains(&ancestor))
    }

    /// Changes whenever fallback lookup could give a different answer.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.entries.len())
            .field("epoch", &self.epoch)
            .finish()
    }
}
