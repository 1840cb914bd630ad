//! Domain Value Objects
//!
//! Immutable value types: field values, field lists, identities and
//! registry statistics and configuration warnings.

mod config_warning;
mod fields;
mod identity;
mod stats;
mod value;

pub use config_warning::ConfigWarning;
pub use fields::Fields;
pub(crate) use identity::{Key, Shape};
pub use identity::Identity;
pub use stats::{RegistryStats, TableStats};
pub use value::{FieldValue, ObjectRef, Value};
