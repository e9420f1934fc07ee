//! The session-scoped map of generated collections.

use crate::values::{FieldValue, Record};
use std::collections::HashMap;

/// What a dependency accessor hands back from the pool.
///
/// The original duck-typed accessor could return either a whole generated
/// collection or a derived scalar (a date, an id); the two shapes are kept
/// as explicit variants. An empty `Records` list is the empty/invalid
/// dependency.
#[derive(Debug, Clone, PartialEq)]
pub enum DependencyValue {
    /// A generated (or tapped-in) collection
    Records(Vec<Record>),
    /// A single derived value
    Value(FieldValue),
}

impl DependencyValue {
    /// Whether this dependency resolved to nothing usable.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Records(records) => records.is_empty(),
            Self::Value(value) => value.is_null(),
        }
    }

    /// The records behind this dependency, if it is a collection.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Value(_) => None,
        }
    }
}

/// Map from model id to its generated (or externally loaded) records.
///
/// Created empty per session, appended by the assembler or tap-in loader
/// that owns each model id, read by dependency accessors of later models,
/// and drained entry-by-entry as each model's records are persisted. The
/// pool is threaded explicitly into assembly; it is never a global.
#[derive(Debug, Clone, Default)]
pub struct DataPool {
    collections: HashMap<String, Vec<Record>>,
}

impl DataPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register records under a model id, replacing any prior entry.
    pub fn insert(&mut self, model_id: impl Into<String>, records: Vec<Record>) {
        self.collections.insert(model_id.into(), records);
    }

    /// Get the records generated for a model id.
    pub fn get(&self, model_id: &str) -> Option<&[Record]> {
        self.collections.get(model_id).map(Vec::as_slice)
    }

    /// Remove and return a model's records (the persistence step).
    pub fn remove(&mut self, model_id: &str) -> Option<Vec<Record>> {
        self.collections.remove(model_id)
    }

    /// Whether the pool holds records for a model id.
    pub fn contains(&self, model_id: &str) -> bool {
        self.collections.contains_key(model_id)
    }

    /// All model ids currently in the pool.
    pub fn model_ids(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Look a model's collection up as a dependency.
    ///
    /// A missing model id resolves to the empty dependency, which dependency
    /// resolution reports and degrades on; forward references are not
    /// supported.
    pub fn dependency(&self, model_id: &str) -> DependencyValue {
        DependencyValue::Records(self.get(model_id).map(<[Record]>::to_vec).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Record {
        let mut record = Record::new();
        record.insert("name".to_string(), FieldValue::String(name.to_string()));
        record
    }

    #[test]
    fn test_insert_get_remove() {
        let mut pool = DataPool::new();
        assert!(pool.is_empty());

        pool.insert("users", vec![record("a"), record("b")]);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains("users"));
        assert_eq!(pool.get("users").unwrap().len(), 2);

        let removed = pool.remove("users").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!pool.contains("users"));
    }

    #[test]
    fn test_dependency_lookup() {
        let mut pool = DataPool::new();
        pool.insert("users", vec![record("a")]);

        let found = pool.dependency("users");
        assert!(!found.is_empty());
        assert_eq!(found.records().unwrap().len(), 1);

        // Forward references resolve to the empty dependency
        let missing = pool.dependency("posts");
        assert!(missing.is_empty());
        assert_eq!(missing.records().unwrap().len(), 0);
    }

    #[test]
    fn test_dependency_value_emptiness() {
        assert!(DependencyValue::Records(vec![]).is_empty());
        assert!(DependencyValue::Value(FieldValue::Null).is_empty());
        assert!(!DependencyValue::Value(FieldValue::Int(1)).is_empty());
        assert!(DependencyValue::Value(FieldValue::Int(1)).records().is_none());
    }
}
