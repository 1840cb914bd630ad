//! Scenario: Configuring a registry from a file
//!
//! Journey: An application ships a `records.toml`, loads it with overrides
//! from the environment, and builds its registry from the result.
//!
//! Success Criteria:
//! - Unknown keys are reported with a suggestion, loading still succeeds
//! - The configured registry honours the settings

use std::fs;

use tempfile::tempdir;

use crate::common::*;
use interned_records::{CompositeLookup, Registry, RegistryConfig};

/// SCENARIO: Load config with a typo, then intern under it
#[test]
fn scenario_registry_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.toml");
    fs::write(
        &path,
        r#"
composite_lookup = "indexed"
drop_empty_table = false
"#,
    )
    .unwrap();

    let (config, warnings) = RegistryConfig::load_with_warnings(&path).unwrap();
    assert_eq!(config.composite_lookup, CompositeLookup::Indexed);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("drop_empty_tables"));

    let registry = Registry::with_config(config);
    let bob = user(&registry, "bob", 23, "a@x");
    assert_eq!(registry.config().composite_lookup, CompositeLookup::Indexed);
    assert_eq!(registry.composite_key_count::<User>(), 1);

    // the typo did not switch table dropping off
    drop(bob);
    assert_eq!(registry.table_count(), 0);
}

/// SCENARIO: Keeping empty tables around
#[test]
fn scenario_registry_keeps_empty_tables() {
    let config = RegistryConfig::from_toml_str("drop_empty_tables = false").unwrap();
    let registry = Registry::with_config(config);

    drop(money(&registry, 1));
    assert_eq!(registry.table_count(), 1);
    assert_eq!(registry.stats().live(), 0);

    // reconfiguring is refused while tables exist
    assert!(registry.configure(RegistryConfig::default()).is_err());
}
