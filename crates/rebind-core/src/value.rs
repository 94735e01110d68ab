//! Typed values stored in a state container.

use std::fmt;

/// A value held under a name in a [`StateContainer`](crate::StateContainer).
///
/// Values are replaced wholesale on every update. The kind of a value is
/// fixed at `init` time: updates that would change the kind are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed integer, e.g. a counter.
    Int(i64),
    /// Text, e.g. the contents of a text field.
    Text(String),
    /// A flag, e.g. the checked state of a checkbox.
    Bool(bool),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Text,
    Bool,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Text => "text",
            ValueKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Rust types that can be read out of a [`Value`] of a fixed kind.
///
/// Used by the typed accessors on the state container
/// (`get_as`, `update_with`).
pub trait FromValue: Sized + Into<Value> {
    /// The kind this type is stored as.
    const KIND: ValueKind;

    /// Extract the payload, or hand the value back if the kind differs.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}
