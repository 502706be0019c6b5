// File: src/rule_map.rs
// Purpose: Dotted field paths and the case-insensitive path -> rules table

use crate::wire::WireRule;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Dotted identifier of a property within a model graph (`ShippingAddress.Street`).
///
/// Comparison and hashing ignore case.
#[derive(Debug, Clone, Eq)]
pub struct FieldPath {
    path: String,
    folded: String,
}

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let folded = path.to_lowercase();
        Self { path, folded }
    }

    /// `prefix.name`, or bare `name` when the prefix is empty
    pub fn join(prefix: &str, name: &str) -> Self {
        if prefix.is_empty() {
            Self::new(name)
        } else {
            Self::new(format!("{}.{}", prefix, name))
        }
    }

    /// Path as declared
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        FieldPath::new(path)
    }
}

/// Field path -> ordered wire rules for one model graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMap {
    entries: HashMap<FieldPath, Vec<WireRule>>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rules for a path, replacing any earlier entry
    pub fn insert(&mut self, path: FieldPath, rules: Vec<WireRule>) {
        // Keep the newest spelling of the key as well as the newest rules
        self.entries.remove(&path);
        self.entries.insert(path, rules);
    }

    /// Merge another map in; entries from `other` win on collision
    pub fn merge(&mut self, other: RuleMap) {
        for (path, rules) in other.entries {
            self.insert(path, rules);
        }
    }

    /// Rules for a path (case-insensitive)
    pub fn get(&self, path: &str) -> Option<&[WireRule]> {
        self.entries
            .get(&FieldPath::new(path))
            .map(|rules| rules.as_slice())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&FieldPath::new(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths sorted case-insensitively
    pub fn paths(&self) -> Vec<&FieldPath> {
        let mut paths: Vec<&FieldPath> = self.entries.keys().collect();
        paths.sort_by(|a, b| a.folded.cmp(&b.folded));
        paths
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[WireRule])> {
        self.entries
            .iter()
            .map(|(path, rules)| (path, rules.as_slice()))
    }

    /// JSON object of path -> rules, keys sorted
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for RuleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for path in self.paths() {
            map.serialize_entry(path.as_str(), &self.entries[path])?;
        }
        map.end()
    }
}
