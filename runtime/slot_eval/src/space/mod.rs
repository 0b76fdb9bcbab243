//! The object space: classes, interned names, the resolution cache and the
//! dispatch policy that instances of those classes share.
//!
//! Instances are not stored here. Callers own them and lend them to the
//! space for each call; the space only holds what every instance of a class
//! agrees on.

mod builder;

pub use builder::ObjectSpaceBuilder;

use parking_lot::RwLock;
use slot_ir::{Name, SharedInterner};
use slot_object::{
    unknown_class_name, Callable, ClassBuilder, ClassId, ClassRegistry, Instance, ObjResult,
    Receiver, Value,
};

use crate::cache::{CacheStats, ResolutionCache, ResolutionKey, Strategy};
use crate::call_stack::CallStack;
use crate::capability::{probe, probe_chain, FallbackHit};
use crate::config::SpaceConfig;
use crate::resolver::Dispatch;

/// Shared state for a family of classes and their instances.
///
/// `ObjectSpace` is `Send + Sync`: classes can be defined and instances
/// dispatched from any thread. The registry lock is never held while a
/// callable runs.
pub struct ObjectSpace {
    interner: SharedInterner,
    registry: RwLock<ClassRegistry>,
    cache: ResolutionCache,
    config: SpaceConfig,
}

impl ObjectSpace {
    /// An empty space with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ObjectSpaceBuilder {
        ObjectSpaceBuilder::new()
    }

    pub(crate) fn from_parts(interner: SharedInterner, config: SpaceConfig) -> Self {
        ObjectSpace {
            interner,
            registry: RwLock::new(ClassRegistry::new()),
            cache: ResolutionCache::new(),
            config,
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Register a class.
    ///
    /// Fails with `DuplicateClass` if the name is taken, or `UnknownClass`
    /// if the parent was never registered here.
    pub fn define_class(&self, builder: ClassBuilder) -> ObjResult<ClassId> {
        self.registry.write().register(builder, &self.interner)
    }

    /// Add or replace a fallback on a registered class.
    ///
    /// Existing instances of the class and its subclasses see it on their
    /// next own-slot miss. Returns the fallback it replaced.
    pub fn add_fallback<F>(&self, class: ClassId, name: &str, func: F) -> ObjResult<Option<Callable>>
    where
        F: Fn(&mut dyn Receiver, &[Value]) -> ObjResult<Option<Value>> + Send + Sync + 'static,
    {
        self.add_fallback_callable(class, name, Callable::new(func))
    }

    pub fn add_fallback_callable(
        &self,
        class: ClassId,
        name: &str,
        callable: Callable,
    ) -> ObjResult<Option<Callable>> {
        let name = self.interner.intern(name);
        self.registry.write().add_fallback(class, name, callable)
    }

    /// Find a class by name. Fails with `UnknownClassName`.
    pub fn class_named(&self, name: &str) -> ObjResult<ClassId> {
        self.interner
            .get(name)
            .and_then(|name| self.registry.read().lookup(name))
            .ok_or_else(|| unknown_class_name(name))
    }

    /// The name a class was registered under.
    pub fn class_name(&self, class: ClassId) -> Option<&'static str> {
        let registry = self.registry.read();
        let name = registry.get(class)?.name();
        Some(self.interner.lookup(name))
    }

    pub fn contains_class(&self, class: ClassId) -> bool {
        self.registry.read().get(class).is_some()
    }

    /// Whether `class` is `ancestor` or a descendant of it.
    pub fn inherits(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.registry.read().inherits(class, ancestor)
    }

    /// Number of registered classes.
    pub fn class_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Run `f` with a fresh top-level dispatch on `instance`.
    pub(crate) fn with_dispatch<R>(
        &self,
        instance: &mut Instance,
        f: impl FnOnce(&mut Dispatch<'_>) -> R,
    ) -> R {
        let mut stack = CallStack::new(self.config.max_call_depth);
        let mut dispatch = Dispatch::new(self, instance, &mut stack);
        f(&mut dispatch)
    }

    /// The nearest fallback for `name` in `class`'s chain.
    ///
    /// Goes through the resolution cache when enabled. The registry read
    /// lock is held across the cache lookup so the epoch the cache checks
    /// against is the one the probe sees.
    pub(crate) fn find_fallback(&self, class: ClassId, name: Name) -> ObjResult<Option<FallbackHit>> {
        let registry = self.registry.read();
        if !self.config.resolution_cache {
            return probe(&registry, class, name);
        }

        let key = ResolutionKey::new(class, name);
        let strategy = self.cache.fallback_or_probe(key, registry.epoch(), || {
            Ok(probe(&registry, class, name)?.map_or(Strategy::Miss, |hit| hit.strategy()))
        })?;

        Ok(match strategy {
            Strategy::Fallback { defined_in } => registry
                .get(defined_in)
                .and_then(|defining| defining.fallback(name))
                .map(|callable| FallbackHit {
                    callable: callable.clone(),
                    defined_in,
                }),
            Strategy::OwnSlot | Strategy::Miss => None,
        })
    }

    /// Record that an own slot answered `name` for an instance of `class`.
    pub(crate) fn note_own_slot(&self, class: ClassId, name: Name) {
        if !self.config.resolution_cache {
            return;
        }
        let epoch = self.registry.read().epoch();
        self.cache.record_own_slot(ResolutionKey::new(class, name), epoch);
    }

    /// The nearest fallback for `name` strictly above `current`.
    pub(crate) fn find_above(&self, current: ClassId, name: Name) -> Option<FallbackHit> {
        let registry = self.registry.read();
        let chain = registry.ancestors(current)?;
        probe_chain(&registry, chain.get(1..)?, name)
    }

    pub(crate) fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.registry.read().get(class)?.parent()
    }

    /// Class name for messages, or its id if unregistered.
    pub(crate) fn class_label(&self, class: ClassId) -> String {
        self.class_name(class)
            .map_or_else(|| class.to_string(), str::to_string)
    }
}

impl Default for ObjectSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSpace")
            .field("classes", &self.class_count())
            .field("interner", &self.interner)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}
