//! Slot Eval - dispatch for the slotkit object model.
//!
//! This crate answers one question for every call made on an instance:
//! what produces the value for this name?
//!
//! # Architecture
//!
//! - [`ObjectSpace`]: classes, interned names, resolution cache and
//!   dispatch policy shared by a family of instances
//! - resolver: own slot first, then the nearest class fallback, else empty
//! - mutator: `set` / `clear` on an instance's own slots
//! - constructor: build an instance from a [`Configuration`], then run its
//!   deferred calls
//! - [`Capability`]: the `can` query and the handle it returns
//!
//! Callables receive the instance as `&mut dyn Receiver` and call back into
//! the dispatcher through it.
//!
//! # Re-exports
//!
//! The object model types from `slot_object` are re-exported so most users
//! need only this crate.

mod cache;
mod call_stack;
mod capability;
mod config;
mod constructor;
mod mutator;
mod resolver;
mod space;
mod stack;

pub use cache::{CacheStats, ResolutionCache, ResolutionKey, Strategy};
pub use capability::{probe, BoundCapability, Capability, CapabilitySource, FallbackHit};
pub use config::{SpaceConfig, DEFAULT_MAX_CALL_DEPTH};
pub use constructor::{ConfigEntry, Configuration};
pub use space::{ObjectSpace, ObjectSpaceBuilder};

pub use slot_object::{
    Callable, Class, ClassBuilder, ClassId, ClassRegistry, Instance, InstanceStore, Name,
    ObjBacktrace, ObjError, ObjErrorKind, ObjResult, Receiver, SharedInterner, Slot,
    StringInterner, Value,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect.
///
/// ```bash
/// RUST_LOG=slot_eval=trace cargo test -p slot_eval
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
