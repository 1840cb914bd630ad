//! Configuration warning value object.

use std::path::PathBuf;

/// Non-fatal registry configuration warning.
///
/// Produced while loading a registry config file, e.g. for a key the
/// config does not know. Loading still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The unknown key
    pub key: String,
    /// The file the key was found in
    pub file: PathBuf,
    /// The line number (1-indexed) if available
    pub line: Option<usize>,
    /// A close known key, if there is one
    pub suggestion: Option<String>,
}
