//! Identity value object
//!
//! The identity decides whether two records are "the same" record. Scalars
//! and composites compare by content, objects by reference.

use std::fmt;

use super::fields::Fields;
use super::value::{ObjectRef, Value};

/// The identity of an interned record
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Int(i64),
    Float(f64),
    Str(String),
    /// Another shared object, matched by reference
    Object(ObjectRef),
    /// One named entry per identity-bearing argument
    Composite(Fields),
}

impl Identity {
    /// Returns true for object identities
    pub fn is_object(&self) -> bool {
        matches!(self, Identity::Object(_))
    }

    /// Returns true for composite identities
    pub fn is_composite(&self) -> bool {
        matches!(self, Identity::Composite(_))
    }

    /// The named entries of a composite identity
    pub fn as_composite(&self) -> Option<&Fields> {
        match self {
            Identity::Composite(fields) => Some(fields),
            _ => None,
        }
    }

    /// Split into a ready lookup key or the composite entries that still
    /// need remapping
    pub(crate) fn shape(&self) -> Shape<'_> {
        match self {
            Identity::Int(v) => Shape::Direct(Key::Int(*v)),
            Identity::Float(v) => Shape::Direct(Key::Float(canonical_bits(*v))),
            Identity::Str(v) => Shape::Direct(Key::Str(v.clone())),
            Identity::Object(o) => Shape::Direct(Key::Object(o.address())),
            Identity::Composite(fields) => Shape::Composite(fields),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Int(v) => write!(f, "{}", v),
            Identity::Float(v) => write!(f, "{}", v),
            Identity::Str(v) => write!(f, "{:?}", v),
            Identity::Object(o) => write!(f, "<{} @ {:#x}>", o.type_name(), o.address()),
            Identity::Composite(fields) => {
                write!(f, "[")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<Value> for Identity {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(v) => Identity::Int(v),
            Value::Float(v) => Identity::Float(v),
            Value::Str(v) => Identity::Str(v),
            Value::Bool(v) => Identity::Int(i64::from(v)),
            Value::Object(o) => Identity::Object(o),
        }
    }
}

impl From<&Value> for Identity {
    fn from(value: &Value) -> Self {
        Identity::from(value.clone())
    }
}

impl From<i64> for Identity {
    fn from(v: i64) -> Self {
        Identity::Int(v)
    }
}

impl From<i32> for Identity {
    fn from(v: i32) -> Self {
        Identity::Int(i64::from(v))
    }
}

impl From<f64> for Identity {
    fn from(v: f64) -> Self {
        Identity::Float(v)
    }
}

impl From<&str> for Identity {
    fn from(v: &str) -> Self {
        Identity::Str(v.to_string())
    }
}

impl From<String> for Identity {
    fn from(v: String) -> Self {
        Identity::Str(v)
    }
}

impl From<ObjectRef> for Identity {
    fn from(v: ObjectRef) -> Self {
        Identity::Object(v)
    }
}

impl From<Fields> for Identity {
    fn from(v: Fields) -> Self {
        Identity::Composite(v)
    }
}

pub(crate) enum Shape<'a> {
    Direct(Key),
    Composite(&'a Fields),
}

/// Normalized lookup key.
///
/// Each identity shape has its own variant so a composite key can never
/// collide with a numerically equal scalar key in the same table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    Int(i64),
    Float(u64),
    Str(String),
    /// Only appears inside composite content, never as a table key
    Bool(bool),
    /// Stable integer handed out by the identity remap
    Composite(u32),
    /// Address of the referenced allocation
    Object(usize),
}

impl Key {
    pub(crate) fn is_object(&self) -> bool {
        matches!(self, Key::Object(_))
    }

    /// Content key for one composite entry
    pub(crate) fn of_value(value: &Value) -> Key {
        match value {
            Value::Int(v) => Key::Int(*v),
            Value::Float(v) => Key::Float(canonical_bits(*v)),
            Value::Str(v) => Key::Str(v.clone()),
            Value::Bool(v) => Key::Bool(*v),
            Value::Object(o) => Key::Object(o.address()),
        }
    }
}

// -0.0 and 0.0 are the same identity
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}
