//! Slot IR - identifiers shared by every layer of the object model.
//!
//! - [`Name`]: compact interned identifier used for slot and fallback keys
//! - [`StringInterner`] / [`SharedInterner`]: sharded, thread-safe interning
//! - [`CallName`]: classification of a dynamic call name into get, set,
//!   clear or explicit fallback calls

mod call_name;
mod interner;
mod name;

pub use call_name::{CallName, CLEAR_SUFFIX, RESERVED_PREFIX, SET_SUFFIX};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
