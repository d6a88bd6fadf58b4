//! Feature lifecycle tables
//!
//! The bundled tables are embedded YAML, parsed on first use.

use crate::lifecycle::FeatureLifecycle;
use phpcompat_core::logging;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur when loading a lifecycle table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Table '{0}' is not a mapping of feature names")]
    NotAMapping(String),

    #[error("Entry '{entry}' in table '{table}' is not a mapping")]
    InvalidEntry { table: String, entry: String },
}

/// Named lifecycles with case-insensitive lookup, in file order
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    name: String,
    entries: Vec<(String, FeatureLifecycle)>,
    index: HashMap<String, usize>,
}

impl FeatureTable {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Parse a table from YAML: a mapping of feature name to lifecycle mapping
    pub fn from_yaml(name: &str, yaml: &str) -> Result<Self, TableError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        let mapping = match root {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => return Err(TableError::NotAMapping(name.to_string())),
        };

        let mut table = Self::empty(name);
        for (key, value) in &mapping {
            let feature = match key {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)?.trim().to_string(),
            };
            let Value::Mapping(lifecycle) = value else {
                return Err(TableError::InvalidEntry {
                    table: name.to_string(),
                    entry: feature,
                });
            };
            table.insert(feature, FeatureLifecycle::from_mapping(lifecycle));
        }

        Ok(table)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, feature: impl Into<String>, lifecycle: FeatureLifecycle) {
        let feature = feature.into();
        let key = feature.to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos] = (feature, lifecycle),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((feature, lifecycle));
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureLifecycle> {
        self.index
            .get(&feature.to_lowercase())
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.index.contains_key(&feature.to_lowercase())
    }

    /// Canonical spelling of a feature as written in the table
    pub fn canonical_name(&self, feature: &str) -> Option<&str> {
        self.index
            .get(&feature.to_lowercase())
            .map(|&pos| self.entries[pos].0.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureLifecycle)> {
        self.entries.iter().map(|(name, l)| (name.as_str(), l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse an embedded table; a broken table is logged and treated as empty
fn load_builtin(name: &str, yaml: &str) -> FeatureTable {
    match FeatureTable::from_yaml(name, yaml) {
        Ok(table) => {
            logging::log_table_loaded(name, table.len());
            table
        }
        Err(e) => {
            logging::log(&format!("Failed to load table {}: {}", name, e));
            FeatureTable::empty(name)
        }
    }
}

pub fn removed_functions() -> &'static FeatureTable {
    static TABLE: OnceLock<FeatureTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        load_builtin(
            "removed_functions",
            include_str!("../data/removed_functions.yaml"),
        )
    })
}

pub fn new_functions() -> &'static FeatureTable {
    static TABLE: OnceLock<FeatureTable> = OnceLock::new();
    TABLE.get_or_init(|| load_builtin("new_functions", include_str!("../data/new_functions.yaml")))
}

pub fn new_classes() -> &'static FeatureTable {
    static TABLE: OnceLock<FeatureTable> = OnceLock::new();
    TABLE.get_or_init(|| load_builtin("new_classes", include_str!("../data/new_classes.yaml")))
}

pub fn removed_extensions() -> &'static FeatureTable {
    static TABLE: OnceLock<FeatureTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        load_builtin(
            "removed_extensions",
            include_str!("../data/removed_extensions.yaml"),
        )
    })
}
