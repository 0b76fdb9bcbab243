//! The constructor: build an instance from configuration, then run its
//! deferred calls.
//!
//! Configuration is an ordered list of entries. Base entries become the
//! instance's initial slots. Deferred entries are calls made on the fresh
//! instance once every base slot is in place and the class link is set, in
//! configuration order. A deferred call goes through the dynamic call
//! surface, so a deferred `color_SET` is a set and a deferred `greet` is an
//! ordinary resolution.

use slot_ir::CallName;
use slot_object::{unknown_class, ClassId, Instance, InstanceStore, ObjResult, Slot, Value};

use crate::mutator::check_slot_name;
use crate::ObjectSpace;

/// One configuration entry.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigEntry {
    /// Initial slot.
    Slot { name: String, value: Value },
    /// Call to make after base slots are populated.
    Deferred { name: String, args: Vec<Value> },
}

/// Construction-time configuration.
///
/// ```text
/// let config = Configuration::new()
///     .slot("name", "foo")
///     .deferred("color_SET", vec![Value::string("red")]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Configuration {
    entries: Vec<ConfigEntry>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs.
    ///
    /// A key starting with the reserved prefix `_` is a deferred call to
    /// the rest of the key; its value is the argument list (a list value
    /// spreads, anything else is one argument). Other keys are slots.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| {
                let key = key.as_ref();
                match CallName::deferred_key(key) {
                    Some(name) => ConfigEntry::Deferred {
                        name: name.to_string(),
                        args: value.into_args(),
                    },
                    None => ConfigEntry::Slot {
                        name: key.to_string(),
                        value,
                    },
                }
            })
            .collect();
        Configuration { entries }
    }

    /// Add an initial slot. A later slot with the same name replaces it.
    ///
    /// The name must not start with `_`; `ObjectSpace::build` rejects it
    /// with `ReservedName`.
    #[must_use]
    pub fn slot(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push(ConfigEntry::Slot {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a deferred call.
    #[must_use]
    pub fn deferred(mut self, name: impl Into<String>, args: Vec<Value>) -> Self {
        self.entries.push(ConfigEntry::Deferred {
            name: name.into(),
            args,
        });
        self
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into base slots and deferred calls, each in configuration order.
    fn partition(self) -> (Vec<(String, Value)>, Vec<(String, Vec<Value>)>) {
        let mut base = Vec::new();
        let mut deferred = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Slot { name, value } => base.push((name, value)),
                ConfigEntry::Deferred { name, args } => deferred.push((name, args)),
            }
        }
        (base, deferred)
    }
}

impl ObjectSpace {
    /// Build an instance of `class` from `config`.
    ///
    /// Fails if `class` is unknown, a base slot name uses the reserved
    /// prefix, or a deferred call fails. The partially built instance is
    /// dropped in each case.
    #[tracing::instrument(level = "debug", skip(self, config), fields(entries = config.len()))]
    pub fn build(&self, class: ClassId, config: Configuration) -> ObjResult<Instance> {
        if !self.contains_class(class) {
            return Err(unknown_class(class.raw()));
        }

        let (base, deferred) = config.partition();

        let mut store = InstanceStore::new();
        for (name, value) in base {
            check_slot_name(&name)?;
            store.insert(self.interner().intern(&name), Slot::from(value));
        }
        let mut instance = Instance::with_store(class, store);

        for (name, args) in deferred {
            tracing::trace!(name = %name, args = args.len(), "deferred call");
            self.call(&mut instance, &name, &args)?;
        }

        Ok(instance)
    }
}
