//! Field value object
//!
//! A `Value` is what flows through constructor arguments, `with` overrides
//! and composite identities. Scalars compare by content; objects compare by
//! reference only.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A type-erased strong reference to a shared object.
///
/// Equality and hashing use the address of the shared allocation, never the
/// content: two equal-but-distinct objects are different `ObjectRef`s.
#[derive(Clone)]
pub struct ObjectRef {
    object: Rc<dyn Any>,
    type_name: &'static str,
}

impl ObjectRef {
    /// Wrap a shared object.
    pub fn new<T: Any>(object: Rc<T>) -> Self {
        Self {
            object,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Address of the referenced allocation.
    ///
    /// Stable for as long as this reference (or any clone of it) is alive.
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.object) as *const () as usize
    }

    /// Type name of the referenced object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the concrete shared object, if it has type `T`.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.object).downcast::<T>().ok()
    }

    /// Returns true if both references point at the same allocation.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.address() == other.address()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:#x})", self.type_name, self.address())
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Object(ObjectRef),
}

impl Value {
    /// Human-readable kind, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Object(_) => "object",
        }
    }

    /// Returns true for object references
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

/// A Rust type that can live in a record field.
///
/// Implemented for the scalar primitives and for record handles, so
/// `Slot<T>` can convert to and from the dynamic `Value` representation.
pub trait FieldValue: Clone + Sized {
    /// Kind name reported in type mismatch errors
    const KIND: &'static str;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for i64 {
    const KIND: &'static str = "int";

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const KIND: &'static str = "float";

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    // ints widen to floats, the other way round is rejected
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    const KIND: &'static str = "bool";

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for String {
    const KIND: &'static str = "string";

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for ObjectRef {
    const KIND: &'static str = "object";

    fn into_value(self) -> Value {
        Value::Object(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(o.clone()),
            _ => None,
        }
    }
}
