//! Classes: named fallback tables linked into a single-inheritance chain.

use std::fmt;

use rustc_hash::FxHashMap;
use slot_ir::Name;

use crate::{Callable, ObjResult, Receiver, Value};

/// Index of a class in its `ClassRegistry`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub(crate) const fn new(raw: u32) -> Self {
        ClassId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered class.
///
/// Fallbacks are keyed by their bare name; the reserved prefix only exists
/// at the string call surface.
#[derive(Debug)]
pub struct Class {
    id: ClassId,
    name: Name,
    parent: Option<ClassId>,
    fallbacks: FxHashMap<Name, Callable>,
}

impl Class {
    pub(crate) fn new(
        id: ClassId,
        name: Name,
        parent: Option<ClassId>,
        fallbacks: FxHashMap<Name, Callable>,
    ) -> Self {
        Class {
            id,
            name,
            parent,
            fallbacks,
        }
    }

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// The fallback this class itself defines for `name`, ignoring ancestors.
    #[inline]
    pub fn fallback(&self, name: Name) -> Option<&Callable> {
        self.fallbacks.get(&name)
    }

    pub fn fallback_count(&self) -> usize {
        self.fallbacks.len()
    }

    pub(crate) fn insert_fallback(&mut self, name: Name, callable: Callable) -> Option<Callable> {
        self.fallbacks.insert(name, callable)
    }
}

/// Description of a class before registration.
///
/// ```text
/// let greeter = ClassBuilder::new("Greeter")
///     .fallback("friendly", |this, _| this.get("name", &[]));
/// let id = registry.register(greeter, &interner)?;
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) parent: Option<ClassId>,
    pub(crate) fallbacks: Vec<(String, Callable)>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            parent: None,
            fallbacks: Vec::new(),
        }
    }

    /// Set the parent class. Fallback lookup continues there on a miss.
    #[must_use]
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Define a fallback from a closure.
    #[must_use]
    pub fn fallback<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut dyn Receiver, &[Value]) -> ObjResult<Option<Value>> + Send + Sync + 'static,
    {
        self.fallback_callable(name, Callable::new(func))
    }

    /// Define a fallback from an existing callable.
    ///
    /// Defining the same name twice keeps the later definition.
    #[must_use]
    pub fn fallback_callable(mut self, name: impl Into<String>, callable: Callable) -> Self {
        self.fallbacks.push((name.into(), callable));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
