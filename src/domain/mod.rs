//! Domain Layer
//!
//! ## Structure
//!
//! - `entities/` - records, handles and write-once slots
//! - `value_objects/` - values, field lists, identities
//! - `services/` - the interning registry, identity normalizer and evolution
//! - `policies/` - field constraints enforced by `with`

pub mod entities;
pub mod policies;
pub mod services;
pub mod value_objects;
