//! Classification of dynamic call names.
//!
//! The string call surface spells four different operations with one
//! identifier: `name` (get-or-invoke), `name_SET` (set), `name_CLEAR`
//! (clear) and `_name` (explicit fallback call). [`CallName::parse`] is the
//! only place that looks at that spelling; everything past it works with the
//! typed variant.
//!
//! A slot whose own name ends in `_SET` or `_CLEAR` cannot be reached
//! through the string surface. That is a constraint on permissible names,
//! not something the parser tries to repair.

use std::fmt;

/// Prefix marking an explicit fallback call or a deferred construction entry.
pub const RESERVED_PREFIX: &str = "_";

/// Suffix turning a call into a set.
pub const SET_SUFFIX: &str = "_SET";

/// Suffix turning a call into a clear.
pub const CLEAR_SUFFIX: &str = "_CLEAR";

/// A dynamic call name, classified by role.
///
/// Borrowed from the input; the carried `&str` is the bare slot or fallback
/// name with the prefix or suffix removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallName<'a> {
    /// `name` - resolve own slot, then fallback chain, else empty.
    Get(&'a str),
    /// `name_SET` - store a slot on the instance.
    Set(&'a str),
    /// `name_CLEAR` - remove a slot from the instance.
    Clear(&'a str),
    /// `_name` - explicit fallback call; a miss is an error.
    Fallback(&'a str),
}

impl<'a> CallName<'a> {
    /// Classify a raw call name.
    ///
    /// The reserved prefix wins over the mutation suffixes, so `_x_SET` is a
    /// fallback call named `x_SET` and never a set of a reserved slot.
    pub fn parse(raw: &'a str) -> Self {
        if let Some(rest) = raw.strip_prefix(RESERVED_PREFIX) {
            return CallName::Fallback(rest);
        }
        if let Some(base) = raw.strip_suffix(SET_SUFFIX) {
            if !base.is_empty() {
                return CallName::Set(base);
            }
        }
        if let Some(base) = raw.strip_suffix(CLEAR_SUFFIX) {
            if !base.is_empty() {
                return CallName::Clear(base);
            }
        }
        CallName::Get(raw)
    }

    /// The bare name this call targets.
    pub fn name(self) -> &'a str {
        match self {
            CallName::Get(name)
            | CallName::Set(name)
            | CallName::Clear(name)
            | CallName::Fallback(name) => name,
        }
    }

    /// Whether this call goes to the mutator instead of the resolver.
    pub fn is_mutation(self) -> bool {
        matches!(self, CallName::Set(_) | CallName::Clear(_))
    }

    /// Strip the reserved prefix from a configuration key, if present.
    ///
    /// Used by construction to split deferred entries from base slots.
    pub fn deferred_key(raw: &str) -> Option<&str> {
        raw.strip_prefix(RESERVED_PREFIX)
    }
}

impl fmt::Display for CallName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallName::Get(name) => write!(f, "{name}"),
            CallName::Set(name) => write!(f, "{name}{SET_SUFFIX}"),
            CallName::Clear(name) => write!(f, "{name}{CLEAR_SUFFIX}"),
            CallName::Fallback(name) => write!(f, "{RESERVED_PREFIX}{name}"),
        }
    }
}
