//! Registry statistics value objects

use serde::Serialize;

/// Point-in-time view of one record type's table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub record: &'static str,
    /// Keyed by object references rather than scalars or composites
    pub object_keyed: bool,
    /// Entries in the table, dead ones included
    pub entries: usize,
    pub live: usize,
    pub composite_keys: usize,
}

/// Point-in-time view of a whole registry, tables sorted by record name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub tables: Vec<TableStats>,
}

impl RegistryStats {
    pub fn live(&self) -> usize {
        self.tables.iter().map(|t| t.live).sum()
    }

    pub fn table(&self, record: &str) -> Option<&TableStats> {
        self.tables.iter().find(|t| t.record == record)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
