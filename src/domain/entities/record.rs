//! Record entity
//!
//! A record is an immutable aggregate of named fields plus a hidden
//! identity. Records only come into existence through a [`Registry`], which
//! guarantees at most one live instance per `(record type, identity)`.
//!
//! Value-type authors implement [`Record`]; callers hold [`Handle`]s.

use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::domain::policies::Constraints;
use crate::domain::services::{Registry, RegistryState};
use crate::domain::value_objects::{FieldValue, Fields, Identity, Key, ObjectRef, Value};
use crate::error::{RecordError, RecordResult};

/// The contract a value type fulfils to be interned.
///
/// Most implementations only write `derive_identity` (and maybe
/// `constraints`) by hand and let [`record_fields!`](crate::record_fields)
/// generate the field plumbing.
pub trait Record: Sized + 'static {
    /// Declared field names, in declaration order
    const FIELDS: &'static [&'static str];

    /// The bare instance with every field uninitialized.
    ///
    /// Only the registry and the evolution step populate shells; calling
    /// this directly does not intern anything.
    fn shell() -> Self;

    /// Read one field. `None` when uninitialized or unknown.
    fn field(&self, name: &str) -> Option<Value>;

    /// Initialize one field. Each field accepts exactly one write.
    fn init_field(&mut self, name: &str, value: Value) -> RecordResult<()>;

    /// Short type name used in errors and logs
    fn name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Derive a stable identity from constructor arguments.
    ///
    /// Defaults to a composite of every argument.
    fn derive_identity(args: &Fields) -> RecordResult<Identity> {
        Ok(Identity::Composite(args.clone()))
    }

    /// Build a fully populated instance from constructor arguments.
    ///
    /// Called by the registry on a cache miss only.
    fn create(args: Fields) -> RecordResult<Self> {
        let mut record = Self::shell();
        for (name, value) in args {
            record.init_field(&name, value)?;
        }
        Ok(record)
    }

    /// Field rules enforced by `with`
    fn constraints() -> Constraints {
        Constraints::new()
    }
}

/// Error for a field name a record does not declare
pub fn unknown_property<R: Record>(field: &str) -> RecordError {
    RecordError::UnknownProperty {
        record: R::name().to_string(),
        field: field.to_string(),
    }
}

/// A freshly built record on its way into the registry.
///
/// The identity is stamped at most once: whoever stamps first wins, and the
/// registry only fills it in when the build left it empty.
pub struct Draft<R> {
    value: R,
    identity: Option<Identity>,
}

impl<R> Draft<R> {
    pub fn new(value: R) -> Self {
        Self {
            value,
            identity: None,
        }
    }

    pub fn stamped(value: R, identity: Identity) -> Self {
        Self {
            value,
            identity: Some(identity),
        }
    }

    /// Stamp the identity unless one is already set. Returns whether it took.
    pub fn stamp(&mut self, identity: Identity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        self.identity = Some(identity);
        true
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub(crate) fn into_parts(self) -> (R, Option<Identity>) {
        (self.value, self.identity)
    }
}

impl<R: Record> From<R> for Draft<R> {
    fn from(value: R) -> Self {
        Draft::new(value)
    }
}

/// Shared allocation behind every handle to one record instance.
pub(crate) struct Interned<R: Record> {
    value: R,
    identity: Identity,
    /// Table key the instance was stored under
    key: Key,
    registry: Weak<RefCell<RegistryState>>,
}

impl<R: Record> Interned<R> {
    pub(crate) fn new(
        value: R,
        identity: Identity,
        key: Key,
        registry: Weak<RefCell<RegistryState>>,
    ) -> Self {
        Self {
            value,
            identity,
            key,
            registry,
        }
    }
}

impl<R: Record> Drop for Interned<R> {
    fn drop(&mut self) {
        let Some(state) = self.registry.upgrade() else {
            return;
        };
        // the registry drops no instance under its own borrow, so this only
        // fails when a caller holds the state across a drop
        match state.try_borrow_mut() {
            Ok(mut state) => state.release(TypeId::of::<R>(), R::name(), &self.key, &self.identity),
            Err(_) => warn!(
                record = R::name(),
                identity = %self.identity,
                "registry busy while releasing record; dead entry left for the next miss"
            ),
        };
    }
}

/// A strong reference to an interned record.
///
/// Cloning a handle adds another holder of the same instance; it never
/// copies the record. The instance is released when the last handle goes.
pub struct Handle<R: Record> {
    inner: Rc<Interned<R>>,
}

impl<R: Record> Handle<R> {
    pub(crate) fn from_inner(inner: Rc<Interned<R>>) -> Self {
        Self { inner }
    }

    /// The identity this instance was interned under
    pub fn identity(&self) -> &Identity {
        &self.inner.identity
    }

    /// Derive a new interned record with `overrides` applied.
    ///
    /// The original is left untouched. When the overrides resolve to this
    /// record's own identity, the same instance comes back.
    pub fn with(&self, overrides: Fields) -> RecordResult<Handle<R>> {
        self.registry()?.with(self, overrides)
    }

    /// Copying a record would create a second instance for one identity.
    /// Always fails.
    pub fn try_duplicate(&self) -> RecordResult<Handle<R>> {
        Err(RecordError::Duplicate {
            record: R::name().to_string(),
        })
    }

    /// The registry this record was interned in
    pub fn registry(&self) -> RecordResult<Registry> {
        self.inner
            .registry
            .upgrade()
            .map(Registry::from_state)
            .ok_or_else(|| RecordError::RegistryClosed {
                record: R::name().to_string(),
            })
    }

    /// Type-erased reference to this instance, usable as an object identity
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(Rc::clone(&self.inner))
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }

    /// Number of strong holders of this instance
    pub fn strong_count(this: &Self) -> usize {
        Rc::strong_count(&this.inner)
    }
}

impl<R: Record> Clone for Handle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: Record> Deref for Handle<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.inner.value
    }
}

impl<R: Record> PartialEq for Handle<R> {
    fn eq(&self, other: &Self) -> bool {
        Handle::ptr_eq(self, other)
    }
}

impl<R: Record> Eq for Handle<R> {}

impl<R: Record> Hash for Handle<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("identity", &self.inner.identity)
            .field("value", &self.inner.value)
            .finish()
    }
}

impl<R: Record> FieldValue for Handle<R> {
    const KIND: &'static str = "record";

    fn into_value(self) -> Value {
        Value::Object(self.object_ref())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(o) => o.downcast::<Interned<R>>().map(Handle::from_inner),
            _ => None,
        }
    }
}

impl<R: Record> From<Handle<R>> for Value {
    fn from(handle: Handle<R>) -> Self {
        handle.into_value()
    }
}

impl<R: Record> From<&Handle<R>> for Value {
    fn from(handle: &Handle<R>) -> Self {
        Value::Object(handle.object_ref())
    }
}

impl<R: Record> From<&Handle<R>> for Identity {
    fn from(handle: &Handle<R>) -> Self {
        Identity::Object(handle.object_ref())
    }
}

impl<R: Record + Serialize> Serialize for Handle<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.value.serialize(serializer)
    }
}

/// Records never come back from serialized data: that would bypass the
/// registry and break the one-instance-per-identity rule.
impl<'de, R: Record> Deserialize<'de> for Handle<R> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(D::Error::custom(RecordError::Deserialize {
            record: R::name().to_string(),
        }))
    }
}

/// Generate the field plumbing of a [`Record`] impl.
///
/// Every listed field must be a [`Slot`](crate::Slot) of a
/// [`FieldValue`](crate::FieldValue) type, and the struct must consist of
/// exactly these fields.
///
/// ```
/// use interned_records::{record_fields, Record, Slot};
///
/// struct Money {
///     pennies: Slot<i64>,
/// }
///
/// impl Record for Money {
///     record_fields!(pennies);
/// }
///
/// assert_eq!(Money::FIELDS, &["pennies"]);
/// ```
#[macro_export]
macro_rules! record_fields {
    ($($field:ident),+ $(,)?) => {
        const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

        fn shell() -> Self {
            Self {
                $($field: $crate::Slot::new()),+
            }
        }

        fn field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
            match name {
                $(stringify!($field) => self.$field.value(),)+
                _ => ::std::option::Option::None,
            }
        }

        fn init_field(&mut self, name: &str, value: $crate::Value) -> $crate::RecordResult<()> {
            match name {
                $(stringify!($field) => self.$field.init(name, value),)+
                _ => ::std::result::Result::Err($crate::unknown_property::<Self>(name)),
            }
        }
    };
}
