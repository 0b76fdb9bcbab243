//! Slot contents: a literal value or a callable.

use crate::{Callable, Value};

/// What an instance stores under a name.
///
/// Resolving a `Literal` slot returns the value and ignores call arguments.
/// Resolving a `Callable` slot invokes it with the instance and the
/// arguments, every time.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Literal(Value),
    Callable(Callable),
}

impl Slot {
    pub fn is_callable(&self) -> bool {
        matches!(self, Slot::Callable(_))
    }

    /// The slot as a value; a callable slot becomes `Value::Callable`.
    pub fn to_value(&self) -> Value {
        match self {
            Slot::Literal(value) => value.clone(),
            Slot::Callable(callable) => Value::Callable(callable.clone()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Slot::Literal(value) => value,
            Slot::Callable(callable) => Value::Callable(callable),
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        match value {
            Value::Callable(callable) => Slot::Callable(callable),
            literal => Slot::Literal(literal),
        }
    }
}

impl From<Callable> for Slot {
    fn from(callable: Callable) -> Self {
        Slot::Callable(callable)
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Slot::Literal(Value::string(s))
    }
}

impl From<i64> for Slot {
    fn from(n: i64) -> Self {
        Slot::Literal(Value::Int(n))
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Slot::Literal(Value::Bool(b))
    }
}
