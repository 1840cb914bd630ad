//! Error types for interned records
//!
//! Uses `thiserror` for library errors. Every failure is synchronous and
//! local to the call that raised it; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Main error type for record operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A record type was keyed by objects and by scalars at the same time
    #[error("cannot mix object and non-object ids in the same record type '{record}'")]
    MixedIdentityKinds { record: String },

    /// `with` or `create` named a property the record does not have
    #[error("unknown property '{field}' on record '{record}'")]
    UnknownProperty { record: String, field: String },

    /// `with` tried to change an immutable field
    #[error("cannot change immutable property: {field}")]
    ImmutableField { field: String },

    /// `with` changed a correlated field without its partners
    #[error(
        "cannot change property: {field} without changing {}; changed: {}",
        .missing.join(", "),
        .changed.join(", ")
    )]
    CorrelatedField {
        field: String,
        missing: Vec<String>,
        changed: Vec<String>,
    },

    /// Something tried to produce a second instance for an interned identity
    #[error("do not clone records ('{record}')")]
    Duplicate { record: String },

    /// Something tried to rebuild a record from serialized data
    #[error("do not deserialize records ('{record}')")]
    Deserialize { record: String },

    /// The composite identity remap ran out of integer keys
    #[error("composite identity key space exhausted for '{record}' (limit {limit})")]
    KeyExhausted { record: String, limit: u32 },

    /// A write-once field was written twice
    #[error("property '{field}' is already initialized")]
    AlreadyInitialized { field: String },

    /// A field received a value of the wrong kind
    #[error("property '{field}' expects {expected}, got {found}")]
    FieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An identity-deriving function did not find the argument it needs
    #[error("missing argument '{field}' for record '{record}'")]
    MissingArgument { record: String, field: String },

    /// The registry that interned a record no longer exists
    #[error("the registry that owns '{record}' has been dropped")]
    RegistryClosed { record: String },

    /// Configuration cannot change while records are interned
    #[error("registry configuration cannot change while {live} table(s) are live")]
    RegistryInUse { live: usize },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("invalid registry config in {file}: {message}")]
    Toml { file: PathBuf, message: String },
}
