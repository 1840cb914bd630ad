//! Registry configuration
//!
//! Resolution order:
//! 1. Environment variables (INTERNED_RECORDS_*)
//! 2. Config file passed by the application
//! 3. Built-in defaults

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{load_or_default, load_with_warnings, with_env_overrides};
pub use types::{CompositeLookup, RegistryConfig};
