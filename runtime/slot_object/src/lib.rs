//! Slot Object - the data half of the slotkit object model.
//!
//! An [`Instance`] owns an [`InstanceStore`] of named [`Slot`]s and is linked
//! to one class by [`ClassId`]. Classes live in a [`ClassRegistry`], which
//! records each class's linear ancestor chain and its fallback
//! implementations. Dispatch itself lives in `slot_eval`; callables reach
//! back into it through the [`Receiver`] trait defined here.
//!
//! # Re-exports
//!
//! `Name`, `StringInterner`, `SharedInterner` and `StringLookup` come from
//! `slot_ir` so callers can depend on this crate alone.

mod class;
pub mod errors;
mod instance;
mod receiver;
mod registry;
mod slot;
mod store;
mod value;

pub use class::{Class, ClassBuilder, ClassId};
pub use errors::{
    arity_mismatch, duplicate_class, missing_fallback, recursion_limit_exceeded, reserved_name,
    super_outside_fallback, type_mismatch, unknown_class, unknown_class_name, BacktraceFrame,
    FrameOrigin, ObjBacktrace, ObjError, ObjErrorKind, ObjResult,
};
pub use instance::Instance;
pub use receiver::Receiver;
pub use registry::ClassRegistry;
pub use slot::Slot;
pub use store::InstanceStore;
pub use value::{Callable, CallableFn, Heap, Value};

pub use slot_ir::{Name, SharedInterner, StringInterner, StringLookup};
