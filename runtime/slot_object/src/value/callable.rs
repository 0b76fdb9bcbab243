//! Callable slot values and class fallbacks.

#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of Callable"
)]

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::{ObjResult, Receiver};

/// Signature shared by callable slots and class fallbacks.
///
/// The receiver is the instance the call was made on, wrapped so the
/// function can resolve sibling names, reach its class fallbacks and mutate
/// the instance. `Ok(None)` is an empty result.
pub type CallableFn = dyn Fn(&mut dyn Receiver, &[Value]) -> ObjResult<Option<Value>> + Send + Sync;

/// A shared function stored in a slot or registered as a fallback.
///
/// Cloning is O(1). Equality is identity: two callables are equal only if
/// they share the same allocation.
#[derive(Clone)]
pub struct Callable {
    func: Arc<CallableFn>,
    label: Option<&'static str>,
}

impl Callable {
    /// Wrap a function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut dyn Receiver, &[Value]) -> ObjResult<Option<Value>> + Send + Sync + 'static,
    {
        Callable {
            func: Arc::new(func),
            label: None,
        }
    }

    /// Wrap a function with a label shown in debug output.
    pub fn named<F>(label: &'static str, func: F) -> Self
    where
        F: Fn(&mut dyn Receiver, &[Value]) -> ObjResult<Option<Value>> + Send + Sync + 'static,
    {
        Callable {
            func: Arc::new(func),
            label: Some(label),
        }
    }

    /// Diagnostic label, if one was given.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Invoke with the receiver and call arguments.
    #[inline]
    pub fn call(&self, receiver: &mut dyn Receiver, args: &[Value]) -> ObjResult<Option<Value>> {
        (self.func)(receiver, args)
    }

    /// Whether both handles wrap the same function allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "Callable({label})"),
            None => write!(f, "Callable(<anonymous>)"),
        }
    }
}
