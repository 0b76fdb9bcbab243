//! Slot values.
//!
//! A `Value` is immutable once built: strings and lists are shared, opaque
//! values are shared `Any` handles, and callables are shared functions.
//! Cloning a value never copies its contents.
//!
//! Heap-backed variants go through the factory methods (`Value::string`,
//! `Value::list`, `Value::opaque`) since `Heap::new` is private to this
//! module.

#![expect(
    clippy::disallowed_types,
    reason = "Arc builds the Heap payloads handed to Heap::new"
)]

mod callable;
mod heap;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use callable::{Callable, CallableFn};
pub use heap::Heap;

/// A value stored in a slot, passed as an argument, or returned from a call.
#[derive(Clone)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Immutable string.
    Str(Heap<str>),
    /// Immutable list of values.
    List(Heap<[Value]>),
    /// Host value the object model carries without inspecting.
    Opaque(Heap<dyn Any + Send + Sync>),
    /// Function value. Stored in a slot it makes the slot callable.
    Callable(Callable),
}

impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Heap::new(Arc::from(s.as_ref())))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(Arc::from(items)))
    }

    /// Wrap an arbitrary host value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        let inner: Arc<dyn Any + Send + Sync> = Arc::new(value);
        Value::Opaque(Heap::new(inner))
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Opaque(_) => "opaque",
            Value::Callable(_) => "callable",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow an opaque payload as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Spread a value into call arguments.
    ///
    /// A list becomes its elements; anything else is a single argument.
    pub fn into_args(self) -> Vec<Value> {
        match self {
            Value::List(items) => items.to_vec(),
            other => vec![other],
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::List(a), Value::List(b)) => **a == **b,
            // Opaque values and callables are equal by identity
            (Value::Opaque(a), Value::Opaque(b)) => Heap::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::List(items) => f.debug_tuple("List").field(&&**items).finish(),
            Value::Opaque(_) => write!(f, "Opaque(..)"),
            Value::Callable(c) => write!(f, "{c:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{}", &**s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Opaque(_) => write!(f, "<opaque>"),
            Value::Callable(c) => match c.label() {
                Some(label) => write!(f, "<callable {label}>"),
                None => write!(f, "<callable>"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}
