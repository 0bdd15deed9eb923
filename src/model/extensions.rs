use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::naming::predicate::is_blank;

/// Open key-value bag for generator-specific metadata.
///
/// Lookups of unknown keys return `None`; nothing is ever defaulted. Keys
/// keep their first-insertion order, and the map does not allocate until the
/// first insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(IndexMap<String, Value>);

// Entries go through `insert` so blank keys are dropped on the way in too.
impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut ext = Self::new();
        for (key, value) in raw {
            ext.insert(key, value);
        }
        Ok(ext)
    }
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Blank keys are ignored and return `None`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if is_blank(&key) {
            tracing::debug!("ignoring extension with blank key");
            return None;
        }
        self.0.insert(key, value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
