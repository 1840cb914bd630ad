//! Configuration loading

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::value_objects::ConfigWarning;
use crate::error::ConfigError;

use super::types::{CompositeLookup, RegistryConfig};

pub(crate) const ENV_COMPOSITE_LOOKUP: &str = "INTERNED_RECORDS_COMPOSITE_LOOKUP";
pub(crate) const ENV_COMPOSITE_KEY_LIMIT: &str = "INTERNED_RECORDS_COMPOSITE_KEY_LIMIT";
pub(crate) const ENV_DROP_EMPTY_TABLES: &str = "INTERNED_RECORDS_DROP_EMPTY_TABLES";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(RegistryConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: RegistryConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Toml {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let known = known_keys();
    let warnings = unknown_paths
        .iter()
        .map(|dotted| {
            let key = dotted.rsplit('.').next().unwrap_or(dotted.as_str());
            ConfigWarning {
                key: key.to_string(),
                file: path.to_path_buf(),
                line: assignment_line(&content, key),
                suggestion: closest_key(key, &known),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from `path` if it exists and parses, otherwise defaults
pub fn load_or_default(path: Option<&Path>) -> RegistryConfig {
    if let Some(path) = path {
        if path.exists() {
            match load_with_warnings(path) {
                Ok((config, warnings)) => {
                    for warning in &warnings {
                        warn!(
                            key = %warning.key,
                            file = %warning.file.display(),
                            suggestion = warning.suggestion.as_deref().unwrap_or(""),
                            "unknown registry config key"
                        );
                    }
                    return with_env_overrides(config);
                }
                Err(err) => warn!(%err, "ignoring unreadable registry config"),
            }
        }
    }

    with_env_overrides(RegistryConfig::default())
}

/// Apply environment variable overrides (INTERNED_RECORDS_* prefix)
pub fn with_env_overrides(config: RegistryConfig) -> RegistryConfig {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub(crate) fn apply_overrides<F>(mut config: RegistryConfig, lookup: F) -> RegistryConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_COMPOSITE_LOOKUP) {
        match CompositeLookup::parse(&raw) {
            Some(mode) => config.composite_lookup = mode,
            None => warn!(
                var = ENV_COMPOSITE_LOOKUP,
                value = %raw,
                "invalid value, expected 'linear' or 'indexed'"
            ),
        }
    }

    if let Some(raw) = lookup(ENV_COMPOSITE_KEY_LIMIT) {
        match raw.trim().parse::<u32>() {
            Ok(limit) if limit > 0 => config.composite_key_limit = limit,
            _ => warn!(
                var = ENV_COMPOSITE_KEY_LIMIT,
                value = %raw,
                "invalid value, expected a positive integer"
            ),
        }
    }

    if let Some(raw) = lookup(ENV_DROP_EMPTY_TABLES) {
        config.drop_empty_tables = raw.to_lowercase() != "false" && raw != "0";
    }

    debug!(?config, "registry config resolved");
    config
}

/// Top-level keys a `RegistryConfig` serializes to
fn known_keys() -> Vec<String> {
    toml::Value::try_from(RegistryConfig::default())
        .ok()
        .and_then(|value| value.as_table().map(|table| table.keys().cloned().collect()))
        .unwrap_or_default()
}

/// 1-based line on which `key` is assigned
fn assignment_line(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            line.split_once('=')
                .is_some_and(|(lhs, _)| lhs.trim().trim_matches('"') == key)
        })
        .map(|index| index + 1)
}

/// Closest known key within three edits
fn closest_key(unknown: &str, known: &[String]) -> Option<String> {
    known
        .iter()
        .map(|candidate| (edit_distance(unknown, candidate), candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.clone())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in target.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[target.len()]
}
