//! Interned Records - identity-interned immutable value objects
//!
//! A [`Registry`] keeps at most one live instance per `(record type,
//! identity)`. Asking for a record whose identity is already live returns
//! the existing instance; once every [`Handle`] is gone the entry is
//! evicted. Records change only through [`Handle::with`], which derives a
//! new interned record and leaves the original untouched.
//!
//! ```
//! use interned_records::{fields, record_fields, Fields, Handle, Identity, Record, RecordResult, Registry, Slot};
//!
//! struct Money {
//!     pennies: Slot<i64>,
//! }
//!
//! impl Record for Money {
//!     record_fields!(pennies);
//!
//!     fn derive_identity(args: &Fields) -> RecordResult<Identity> {
//!         Ok(Identity::from(args.require(Self::name(), "pennies")?))
//!     }
//! }
//!
//! let registry = Registry::new();
//! let a: Handle<Money> = registry.from_args(fields! { pennies: 100 }).unwrap();
//! let b: Handle<Money> = registry.from_args(fields! { pennies: 100 }).unwrap();
//! assert!(Handle::ptr_eq(&a, &b));
//! ```

pub mod config;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use config::{CompositeLookup, ConfigWarning, RegistryConfig};
pub use domain::entities::{unknown_property, Draft, Handle, Record, Slot};
pub use domain::policies::{Constraints, FieldConstraint};
pub use domain::services::Registry;
pub use domain::value_objects::{
    FieldValue, Fields, Identity, ObjectRef, RegistryStats, TableStats, Value,
};
pub use error::{ConfigError, RecordError, RecordResult};
