//! Domain Services
//!
//! - `normalizer` - identity to lookup key, composite remapping
//! - `registry` - per-type interning tables and the drop hook
//! - `evolution` - `with`, copy-on-write derivation of records

mod evolution;
pub(crate) mod normalizer;
mod registry;

pub(crate) use registry::RegistryState;
pub use registry::Registry;
